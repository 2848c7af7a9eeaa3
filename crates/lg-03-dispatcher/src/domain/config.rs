//! Dispatcher configuration with validation.

use super::notifications::DEFAULT_NOTIFICATION_CAP;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Where the document lives and how hard to try when writing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatcherConfig {
    /// Path of the league document inside the store.
    pub data_path: String,
    /// Directory that receives timestamped backup copies.
    pub backup_dir: String,
    /// Notifications retained, newest first.
    pub notification_cap: usize,
    /// Extra read-modify-write attempts after a version conflict.
    pub conflict_retries: u32,
    /// Upper bound on any single store call.
    #[serde(with = "humantime_serde")]
    pub store_timeout: Duration,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            data_path: "data.json".to_string(),
            backup_dir: "backups".to_string(),
            notification_cap: DEFAULT_NOTIFICATION_CAP,
            conflict_retries: 3,
            store_timeout: Duration::from_secs(15),
        }
    }
}

impl DispatcherConfig {
    pub fn validate(&self) -> Result<(), DispatcherConfigError> {
        if self.data_path.trim().is_empty() {
            return Err(DispatcherConfigError::EmptyPath("data_path"));
        }
        if self.backup_dir.trim().is_empty() {
            return Err(DispatcherConfigError::EmptyPath("backup_dir"));
        }
        if self.notification_cap == 0 {
            return Err(DispatcherConfigError::InvalidLimit(
                "notification_cap cannot be 0".into(),
            ));
        }
        if self.store_timeout.is_zero() {
            return Err(DispatcherConfigError::InvalidTimeout(
                "store_timeout cannot be 0".into(),
            ));
        }
        Ok(())
    }

    /// Store path of a backup taken at `stamp` (already formatted).
    pub fn backup_path(&self, stamp: &str) -> String {
        format!("{}/data-{}.json", self.backup_dir.trim_end_matches('/'), stamp)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatcherConfigError {
    #[error("{0} cannot be empty")]
    EmptyPath(&'static str),
    #[error("invalid limit: {0}")]
    InvalidLimit(String),
    #[error("invalid timeout: {0}")]
    InvalidTimeout(String),
}
