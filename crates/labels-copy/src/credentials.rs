use anyhow::{Context, Result};
use dialoguer::{theme::ColorfulTheme, Password};
use github_backend::Auth;
use labels_core::SyncError;

use crate::config::Config;

/// Pick the authentication for a run.
///
/// A login (from the command line or config) takes a prompted password and is
/// sent as basic auth; otherwise the token is used. No credential at all is an
/// error, raised before any remote call.
pub fn resolve(config: &Config) -> Result<Auth> {
    resolve_with(config, prompt_password)
}

fn resolve_with<F>(config: &Config, password: F) -> Result<Auth>
where
    F: FnOnce(&str) -> Result<String>,
{
    if let Some(login) = config.login.as_deref().filter(|l| !l.is_empty()) {
        let password = password(login)?;
        return Ok(Auth::Basic {
            login: login.to_string(),
            password,
        });
    }

    match config.token.as_deref().filter(|t| !t.is_empty()) {
        Some(token) => Ok(Auth::Token(token.to_string())),
        None => Err(SyncError::NoCredential.into()),
    }
}

fn prompt_password(login: &str) -> Result<String> {
    Password::with_theme(&ColorfulTheme::default())
        .with_prompt(format!("GitHub password for {}", login))
        .interact()
        .context("Failed to read password")
}
