use anyhow::{anyhow, Result};
use directories::{BaseDirs, ProjectDirs};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use labels_core::snapshot::DEFAULT_DUMP_FILE;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_NAME: &str = "github-labels-copy";

/// Merged configuration from files and environment
#[derive(Debug, Deserialize, Serialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Personal access token
    pub token: Option<String>,
    /// Login used for basic auth; the password is always prompted
    pub login: Option<String>,
    /// API base URL (GitHub Enterprise)
    pub base_url: Option<String>,
    /// Snapshot file written in dump mode
    pub dump_file: Option<PathBuf>,
}

impl Config {
    pub fn load(config_path: Option<PathBuf>) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        let explicit_path = config_path.as_deref();
        if let Some(path) = explicit_path {
            if !path.exists() {
                return Err(anyhow!("Config file not found: {}", path.display()));
            }
        }

        for path in config_paths(explicit_path) {
            if path.exists() {
                figment = figment.merge(Toml::file(path));
            }
        }

        // Legacy GITHUB_API_TOKEN first so LABELS_COPY_TOKEN wins over it
        figment = figment
            .merge(Env::raw().only(&["GITHUB_API_TOKEN"]).map(|_| "token".into()))
            .merge(Env::prefixed("LABELS_COPY_").ignore(&["CONFIG"]));

        figment
            .extract()
            .map_err(|e| anyhow!("Failed to load config: {}", e))
    }

    pub fn merge_with_cli(
        &mut self,
        cli_token: Option<String>,
        cli_login: Option<String>,
        cli_base_url: Option<String>,
        cli_dump_file: Option<PathBuf>,
    ) {
        // An explicit login on the command line means basic auth, whatever the config says
        if let Some(login) = cli_login {
            self.login = Some(login);
            self.token = None;
        }
        if let Some(token) = cli_token {
            self.token = Some(token);
            self.login = None;
        }
        if let Some(url) = cli_base_url {
            self.base_url = Some(url);
        }
        if let Some(path) = cli_dump_file {
            self.dump_file = Some(path);
        }
    }

    pub fn dump_file(&self) -> PathBuf {
        self.dump_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DUMP_FILE))
    }
}

fn config_paths(explicit: Option<&Path>) -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Some(path) = explicit {
        paths.push(path.to_path_buf());
        return paths;
    }

    if let Some(path) = get_project_config_path() {
        push_unique(&mut paths, path);
    }
    if let Some(path) = get_xdg_config_path() {
        push_unique(&mut paths, path);
    }
    if let Some(path) = get_local_config_path() {
        push_unique(&mut paths, path);
    }

    paths
}

fn push_unique(paths: &mut Vec<PathBuf>, path: PathBuf) {
    if !paths.contains(&path) {
        paths.push(path);
    }
}

fn get_project_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", APP_NAME).map(|d| d.config_dir().join("config.toml"))
}

fn get_xdg_config_path() -> Option<PathBuf> {
    if let Some(dir) = std::env::var_os("XDG_CONFIG_HOME") {
        return Some(PathBuf::from(dir).join(APP_NAME).join("config.toml"));
    }

    BaseDirs::new().map(|dirs| {
        dirs.home_dir()
            .join(".config")
            .join(APP_NAME)
            .join("config.toml")
    })
}

fn get_local_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|dir| dir.join(format!("{}.toml", APP_NAME)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;

    const ENV_VARS: [&str; 3] = ["GITHUB_API_TOKEN", "LABELS_COPY_TOKEN", "LABELS_COPY_BASE_URL"];

    fn clear_env() {
        for var in ENV_VARS {
            std::env::remove_var(var);
        }
    }

    fn write_config(dir: &tempfile::TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("custom.toml");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    #[serial]
    fn test_explicit_config_file() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            r#"
token = "file-token"
base_url = "https://github.example.com/api/v3"
dump_file = "out.yaml"
"#,
        );

        let config = Config::load(Some(path)).unwrap();
        assert_eq!(config.token.as_deref(), Some("file-token"));
        assert_eq!(
            config.base_url.as_deref(),
            Some("https://github.example.com/api/v3")
        );
        assert_eq!(config.dump_file(), PathBuf::from("out.yaml"));
    }

    #[test]
    #[serial]
    fn test_missing_explicit_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(Some(dir.path().join("nope.toml"))).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    #[serial]
    fn test_env_precedence() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, r#"token = "file-token""#);

        std::env::set_var("GITHUB_API_TOKEN", "legacy-token");
        let config = Config::load(Some(path.clone())).unwrap();
        assert_eq!(config.token.as_deref(), Some("legacy-token"));

        std::env::set_var("LABELS_COPY_TOKEN", "prefixed-token");
        std::env::set_var("LABELS_COPY_BASE_URL", "http://localhost:9999");
        let config = Config::load(Some(path)).unwrap();
        assert_eq!(config.token.as_deref(), Some("prefixed-token"));
        assert_eq!(config.base_url.as_deref(), Some("http://localhost:9999"));

        clear_env();
    }

    #[test]
    fn test_cli_overrides_config() {
        let mut config = Config {
            token: Some("env-token".to_string()),
            login: None,
            base_url: None,
            dump_file: None,
        };

        config.merge_with_cli(Some("cli-token".to_string()), None, None, None);
        assert_eq!(config.token.as_deref(), Some("cli-token"));
        assert_eq!(config.dump_file(), PathBuf::from(DEFAULT_DUMP_FILE));

        config.merge_with_cli(None, Some("octocat".to_string()), None, None);
        assert_eq!(config.login.as_deref(), Some("octocat"));
        assert!(config.token.is_none());
    }
}
