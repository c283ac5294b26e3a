use clap::{ArgAction, Parser, ValueEnum};
use labels_core::{RepoId, SyncError, SyncMode};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "github-labels-copy",
    version,
    about = "Copy issue labels between GitHub repositories",
    long_about = "Copy issue labels between GitHub repositories.\n\n\
        Reconciles the labels of DESTINATION so they match SOURCE: labels missing \
        from the destination are created, labels whose color or description differ \
        are updated, and labels absent from the source are deleted. Without -c, -r \
        or -m every step runs.",
    override_usage = "github-labels-copy [OPTIONS] (--load FILE | SOURCE) (--dump | DESTINATION)"
)]
pub struct Cli {
    /// GitHub login; the password is prompted for interactively
    #[arg(long, conflicts_with = "token", value_name = "LOGIN")]
    pub login: Option<String>,

    /// GitHub personal access token (overrides GITHUB_API_TOKEN and config)
    #[arg(long, value_name = "TOKEN")]
    pub token: Option<String>,

    /// API base URL, e.g. https://github.example.com/api/v3 for GitHub Enterprise
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Create labels missing from the destination
    #[arg(short = 'c', long = "create")]
    pub create: bool,

    /// Remove destination labels that are not in the source
    #[arg(short = 'r', long = "remove")]
    pub remove: bool,

    /// Modify destination labels whose color or description differ
    #[arg(short = 'm', long = "modify")]
    pub modify: bool,

    /// Read the source labels from a snapshot file instead of a repository
    #[arg(long, value_name = "FILE")]
    pub load: Option<PathBuf>,

    /// Write the planned changes to a snapshot file instead of a repository
    #[arg(long)]
    pub dump: bool,

    /// Snapshot file written by --dump [default: labels.yaml]
    #[arg(long, value_name = "FILE", requires = "dump")]
    pub dump_file: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'o', value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// When to colorize output
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to a TOML config file
    #[arg(long, env = "LABELS_COPY_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    /// SOURCE and DESTINATION repositories as owner/name
    #[arg(value_name = "REPOSITORY", num_args = 0..=2)]
    pub repositories: Vec<String>,
}

#[derive(ValueEnum, Clone, Debug, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(ValueEnum, Clone, Debug, Copy, Default)]
pub enum ColorChoice {
    /// Colorize output if stdout is a terminal
    #[default]
    Auto,
    /// Always colorize output
    Always,
    /// Never colorize output
    Never,
}

/// Where the desired labels come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Repo(RepoId),
    Snapshot(PathBuf),
}

/// Where the changes go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Repo(RepoId),
    Dump,
}

impl Cli {
    /// Resolve the positional repositories against --load and --dump.
    ///
    /// `--load` replaces SOURCE and `--dump` replaces DESTINATION, so the number
    /// of positionals expected is 2 minus the flags given.
    pub fn endpoints(&self) -> Result<(Source, Destination), SyncError> {
        let expected = usize::from(self.load.is_none()) + usize::from(!self.dump);
        if self.repositories.len() != expected {
            return Err(SyncError::InvalidInput(format!(
                "expected {} repositor{} but got {}; usage: (--load FILE | SOURCE) (--dump | DESTINATION)",
                expected,
                if expected == 1 { "y" } else { "ies" },
                self.repositories.len()
            )));
        }

        let mut positionals = self.repositories.iter();

        let source = match &self.load {
            Some(path) => Source::Snapshot(path.clone()),
            None => Source::Repo(next_repo(&mut positionals)?),
        };

        let destination = if self.dump {
            Destination::Dump
        } else {
            Destination::Repo(next_repo(&mut positionals)?)
        };

        Ok((source, destination))
    }

    /// Selected sync steps; no flag selects the full copy
    pub fn modes(&self) -> Vec<SyncMode> {
        SyncMode::selection(self.create, self.remove, self.modify)
    }
}

fn next_repo<'a>(positionals: &mut impl Iterator<Item = &'a String>) -> Result<RepoId, SyncError> {
    positionals
        .next()
        .ok_or_else(|| SyncError::InvalidInput("missing repository argument".to_string()))?
        .parse()
}
