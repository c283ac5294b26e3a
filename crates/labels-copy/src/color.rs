use crate::cli::{ColorChoice, OutputFormat};
use std::io::IsTerminal;

/// Decide whether output is colorized and apply it globally
pub fn init(choice: ColorChoice, format: OutputFormat) -> bool {
    let enabled = should_color(
        choice,
        format,
        std::env::var_os("NO_COLOR").is_some(),
        std::io::stdout().is_terminal(),
    );
    colored::control::set_override(enabled);
    enabled
}

fn should_color(choice: ColorChoice, format: OutputFormat, no_color: bool, tty: bool) -> bool {
    if format == OutputFormat::Json {
        return false;
    }

    match choice {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        // https://no-color.org/
        ColorChoice::Auto => !no_color && tty,
    }
}
