//! Environment configuration.
//!
//! | variable | default | meaning |
//! |----------|---------|---------|
//! | `ADMIN_SECRET` | - | shared secret for every non-health action |
//! | `LEAGUE_STORE` | `github` | `github` or `memory` (demo, not persisted) |
//! | `GITHUB_TOKEN` | - | store credential |
//! | `GITHUB_REPO` | - | `owner/name` holding the document |
//! | `GITHUB_BRANCH` | `main` | |
//! | `GITHUB_API_URL` | `https://api.github.com` | |
//! | `LEAGUE_DATA_PATH` | `data.json` | document path in the repository |
//! | `LEAGUE_BACKUP_DIR` | `backups` | |
//! | `LEAGUE_HTTP_PORT` | `3000` | |
//! | `LEAGUE_NOTIFICATION_CAP` | `100` | |
//! | `LEAGUE_CONFLICT_RETRIES` | `3` | |
//! | `LEAGUE_STORE_TIMEOUT_SECS` | `15` | per store call |
//! | `LEAGUE_REQUEST_TIMEOUT_SECS` | `30` | per HTTP request |
//! | `LEAGUE_LOG_LEVEL` / `RUST_LOG` | `info` | tracing filter |
//! | `LEAGUE_JSON_LOGS` | `false` | JSON log lines |
//!
//! A missing secret or store credential is not a startup error: the server
//! starts and answers `ServerMisconfigured` until it is fixed.

use lg_03_dispatcher::{DispatcherConfig, DispatcherConfigError};
use lg_04_api_gateway::{ConfigError, GatewayConfig};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("{key}={value:?} is invalid: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
    #[error(transparent)]
    Dispatcher(#[from] DispatcherConfigError),
    #[error(transparent)]
    Gateway(#[from] ConfigError),
}

/// Which document store backs the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    GitHub,
    /// Process-local store seeded on first read. Lost on restart.
    Memory,
}

impl FromStr for StoreKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "github" => Ok(StoreKind::GitHub),
            "memory" => Ok(StoreKind::Memory),
            other => Err(format!("unknown store '{other}', expected github or memory")),
        }
    }
}

/// GitHub repository settings. Only complete when both token and repository
/// are present.
#[derive(Clone, PartialEq, Eq)]
pub struct GitHubSettings {
    pub token: String,
    pub repository: String,
    pub branch: String,
    pub api_url: String,
}

impl fmt::Debug for GitHubSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitHubSettings")
            .field("token", &"<redacted>")
            .field("repository", &self.repository)
            .field("branch", &self.branch)
            .field("api_url", &self.api_url)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// `EnvFilter` directive, e.g. `info` or `lg_03_dispatcher=debug`.
    pub filter: String,
    pub json: bool,
}

#[derive(Clone)]
pub struct AppConfig {
    pub admin_secret: Option<String>,
    pub store: StoreKind,
    pub github: Option<GitHubSettings>,
    pub dispatcher: DispatcherConfig,
    pub gateway: GatewayConfig,
    pub log: LogConfig,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("admin_secret", &self.admin_secret.as_ref().map(|_| "<redacted>"))
            .field("store", &self.store)
            .field("github", &self.github)
            .field("dispatcher", &self.dispatcher)
            .field("gateway", &self.gateway)
            .field("log", &self.log)
            .finish()
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let store = parse_or(&get, "LEAGUE_STORE", StoreKind::GitHub)?;

        let github = match (get("GITHUB_TOKEN"), get("GITHUB_REPO")) {
            (Some(token), Some(repository)) => Some(GitHubSettings {
                token,
                repository,
                branch: get("GITHUB_BRANCH").unwrap_or_else(|| "main".to_string()),
                api_url: get("GITHUB_API_URL")
                    .unwrap_or_else(|| "https://api.github.com".to_string()),
            }),
            _ => None,
        };

        let mut dispatcher = DispatcherConfig::default();
        if let Some(path) = get("LEAGUE_DATA_PATH") {
            dispatcher.data_path = path;
        }
        if let Some(dir) = get("LEAGUE_BACKUP_DIR") {
            dispatcher.backup_dir = dir;
        }
        dispatcher.notification_cap =
            parse_or(&get, "LEAGUE_NOTIFICATION_CAP", dispatcher.notification_cap)?;
        dispatcher.conflict_retries =
            parse_or(&get, "LEAGUE_CONFLICT_RETRIES", dispatcher.conflict_retries)?;
        dispatcher.store_timeout = Duration::from_secs(parse_or(
            &get,
            "LEAGUE_STORE_TIMEOUT_SECS",
            dispatcher.store_timeout.as_secs(),
        )?);
        dispatcher.validate()?;

        let mut gateway = GatewayConfig::default();
        gateway.http.port = parse_or(&get, "LEAGUE_HTTP_PORT", gateway.http.port)?;
        gateway.timeouts.request = Duration::from_secs(parse_or(
            &get,
            "LEAGUE_REQUEST_TIMEOUT_SECS",
            gateway.timeouts.request.as_secs(),
        )?);
        gateway.validate()?;

        let log = LogConfig {
            filter: get("LEAGUE_LOG_LEVEL")
                .or_else(|| get("RUST_LOG"))
                .unwrap_or_else(|| "info".to_string()),
            json: parse_or(&get, "LEAGUE_JSON_LOGS", false)?,
        };

        Ok(Self {
            admin_secret: get("ADMIN_SECRET"),
            store,
            github,
            dispatcher,
            gateway,
            log,
        })
    }
}

fn parse_or<T>(
    get: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, AppConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match get(key) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|e: T::Err| AppConfigError::InvalidValue {
                key,
                reason: e.to_string(),
                value,
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, AppConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults_with_empty_environment() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.admin_secret, None);
        assert_eq!(config.store, StoreKind::GitHub);
        assert!(config.github.is_none());
        assert_eq!(config.dispatcher.data_path, "data.json");
        assert_eq!(config.dispatcher.conflict_retries, 3);
        assert_eq!(config.gateway.http.port, 3000);
        assert_eq!(config.log.filter, "info");
        assert!(!config.log.json);
    }

    #[test]
    fn test_full_environment() {
        let config = config_from(&[
            ("ADMIN_SECRET", "hunter2"),
            ("GITHUB_TOKEN", "ghp_x"),
            ("GITHUB_REPO", "fans/league"),
            ("GITHUB_BRANCH", "data"),
            ("LEAGUE_DATA_PATH", "league/data.json"),
            ("LEAGUE_HTTP_PORT", "8080"),
            ("LEAGUE_NOTIFICATION_CAP", "25"),
            ("LEAGUE_CONFLICT_RETRIES", "5"),
            ("RUST_LOG", "debug"),
            ("LEAGUE_JSON_LOGS", "true"),
        ])
        .unwrap();

        assert_eq!(config.admin_secret.as_deref(), Some("hunter2"));
        let github = config.github.unwrap();
        assert_eq!(github.repository, "fans/league");
        assert_eq!(github.branch, "data");
        assert_eq!(github.api_url, "https://api.github.com");
        assert_eq!(config.dispatcher.data_path, "league/data.json");
        assert_eq!(config.dispatcher.notification_cap, 25);
        assert_eq!(config.dispatcher.conflict_retries, 5);
        assert_eq!(config.gateway.http.port, 8080);
        assert_eq!(config.log.filter, "debug");
        assert!(config.log.json);
    }

    #[test]
    fn test_partial_github_settings_are_ignored() {
        let config = config_from(&[("GITHUB_TOKEN", "ghp_x")]).unwrap();
        assert!(config.github.is_none());
    }

    #[test]
    fn test_invalid_values_are_reported() {
        let err = config_from(&[("LEAGUE_HTTP_PORT", "eighty")]).unwrap_err();
        assert!(err.to_string().contains("LEAGUE_HTTP_PORT"));

        assert!(matches!(
            config_from(&[("LEAGUE_NOTIFICATION_CAP", "0")]),
            Err(AppConfigError::Dispatcher(_))
        ));
        assert!(matches!(
            config_from(&[("LEAGUE_STORE", "postgres")]),
            Err(AppConfigError::InvalidValue { key: "LEAGUE_STORE", .. })
        ));
    }

    #[test]
    fn test_secrets_are_redacted_in_debug() {
        let config = config_from(&[
            ("ADMIN_SECRET", "hunter2"),
            ("GITHUB_TOKEN", "ghp_secret"),
            ("GITHUB_REPO", "fans/league"),
        ])
        .unwrap();
        let printed = format!("{config:?}");
        assert!(!printed.contains("hunter2"));
        assert!(!printed.contains("ghp_secret"));
        assert!(printed.contains("fans/league"));
    }
}
