use crate::cli::OutputFormat;
use colored::Colorize;
use labels_core::{ChangeAction, ChangeSet, LabelChange, SyncError};
use serde::Serialize;
use std::path::PathBuf;

/// Outcome of one run, as printed on stdout
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub source: String,
    pub destination: String,
    /// Set in dump mode: where the change set was written
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dump_file: Option<PathBuf>,
    pub changes: ChangeSet,
}

pub fn output_result<T: Serialize + Displayable>(result: &T, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string_pretty(result) {
                println!("{}", json);
            }
        }
        OutputFormat::Text => {
            println!("{}", result.display());
        }
    }
}

#[derive(Serialize)]
pub struct JsonError {
    pub error: bool,
    pub code: String,
    pub message: String,
}

pub fn output_error(err: &anyhow::Error, format: OutputFormat) {
    let message = match format {
        OutputFormat::Json => {
            let json_err = JsonError {
                error: true,
                code: error_code(err).to_string(),
                message: format!("{:#}", err),
            };
            serde_json::to_string_pretty(&json_err)
                .unwrap_or_else(|_| format!(r#"{{"error": true, "message": "{}"}}"#, err))
        }
        OutputFormat::Text => format!("{}: {:#}", "Error".red().bold(), err),
    };
    eprintln!("{}", message);
}

/// Stable machine-readable code for the JSON error object
fn error_code(err: &anyhow::Error) -> &'static str {
    let Some(sync) = err.chain().find_map(|e| e.downcast_ref::<SyncError>()) else {
        return "error";
    };

    match sync {
        SyncError::Unauthorized => "unauthorized",
        SyncError::TwoFactorRequired => "two_factor_required",
        SyncError::NoCredential => "no_credential",
        SyncError::RepositoryNotFound(_) => "repository_not_found",
        SyncError::LabelNotFound(_) => "label_not_found",
        SyncError::Transient(_) => "connection_error",
        SyncError::RateLimited => "rate_limited",
        SyncError::Api { .. } => "api_error",
        SyncError::Parse(_) => "parse_error",
        SyncError::Format(_) => "malformed_snapshot",
        SyncError::InvalidInput(_) => "invalid_input",
        SyncError::Io(_) => "io_error",
    }
}

pub trait Displayable {
    fn display(&self) -> String;
}

impl Displayable for LabelChange {
    fn display(&self) -> String {
        let marker = match self.action {
            ChangeAction::Create => "+".green().bold(),
            ChangeAction::Update => "~".yellow().bold(),
            ChangeAction::Delete => "-".red().bold(),
        };

        let mut output = format!(
            "{} {} {}",
            marker,
            self.name.white().bold(),
            format!("#{}", self.attrs.color()).dimmed()
        );
        if let Some(desc) = self.attrs.description() {
            output.push_str(&format!(" {}", desc));
        }
        output
    }
}

impl Displayable for RunReport {
    fn display(&self) -> String {
        if self.changes.is_empty() {
            return "Nothing to do".to_string();
        }

        let target = match &self.dump_file {
            Some(path) => path.display().to_string(),
            None => self.destination.clone(),
        };
        let mut output = format!(
            "{} {} {} {}",
            "Labels from".dimmed(),
            self.source.cyan().bold(),
            "to".dimmed(),
            target.cyan().bold()
        );

        for change in self.changes.iter() {
            output.push_str("\n  ");
            output.push_str(&change.display());
        }

        output.push_str(&format!(
            "\n{} {} created, {} updated, {} deleted",
            "Summary:".dimmed(),
            self.changes.count(ChangeAction::Create),
            self.changes.count(ChangeAction::Update),
            self.changes.count(ChangeAction::Delete)
        ));
        output
    }
}
