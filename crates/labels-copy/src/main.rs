mod cli;
mod color;
mod commands;
mod config;
mod credentials;
mod output;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use commands::copy::{handle_copy, CopyPlan};
use config::Config;
use github_backend::{GitHubClient, DEFAULT_API_URL};
use labels_core::LabelHost;
use labels_mock::MockHost;
use output::{output_error, output_result};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let colored = color::init(cli.color, cli.format);
    init_tracing(cli.verbose, colored);

    if let Err(e) = run(&cli) {
        output_error(&e, cli.format);
        return ExitCode::from(1);
    }

    ExitCode::SUCCESS
}

/// Log to stderr; RUST_LOG takes precedence over -v
fn init_tracing(verbose: u8, ansi: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        })
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(ansi)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let (source, destination) = cli.endpoints()?;

    let mut config = Config::load(cli.config.clone())?;
    config.merge_with_cli(
        cli.token.clone(),
        cli.login.clone(),
        cli.base_url.clone(),
        cli.dump_file.clone(),
    );

    let plan = CopyPlan {
        source,
        destination,
        modes: cli.modes(),
        dump_file: config.dump_file(),
    };
    tracing::debug!(?plan, "resolved run");

    let host = if plan.needs_remote() {
        Some(connect(&config)?)
    } else {
        None
    };

    let report = handle_copy(host.as_deref(), &plan)?;
    output_result(&report, cli.format);
    Ok(())
}

/// Open the session used for every remote repository of the run
fn connect(config: &Config) -> Result<Box<dyn LabelHost>> {
    let auth = credentials::resolve(config)?;

    if let Some(dir) = labels_mock::get_mock_dir() {
        tracing::info!(dir = %dir.display(), "using mock host");
        let host = MockHost::new(&dir)
            .with_context(|| format!("Failed to open mock scenario {}", dir.display()))?;
        return Ok(Box::new(host));
    }

    let base_url = config.base_url.as_deref().unwrap_or(DEFAULT_API_URL);
    tracing::debug!(%base_url, ?auth, "connecting to GitHub");
    Ok(Box::new(GitHubClient::with_base_url(base_url, auth)))
}
