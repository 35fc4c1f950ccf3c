//! Runtime settings read from the environment.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;

use crate::source::{DirectorySource, HttpSource, TableSource};

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_FRESHNESS_SECS: i64 = 300;
pub const DEFAULT_LOG_FILE: &str = "logs/driver_scorecard.log";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Directory holding `<segment>.csv` exports.
    pub data_dir: PathBuf,
    /// Base URL serving the same files; used when `data_dir` is missing.
    pub data_url: Option<String>,
    /// How long a loaded snapshot is served before a refresh is attempted.
    pub freshness: chrono::Duration,
    pub log_file_path: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            data_url: None,
            freshness: chrono::Duration::seconds(DEFAULT_FRESHNESS_SECS),
            log_file_path: DEFAULT_LOG_FILE.to_string(),
        }
    }
}

impl Settings {
    /// Reads `SCORECARD_DATA_DIR`, `SCORECARD_DATA_URL`,
    /// `SCORECARD_FRESHNESS_SECS` and `LOG_FILE_PATH`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Settings::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let freshness = match non_empty("SCORECARD_FRESHNESS_SECS") {
            Some(raw) => {
                let secs: i64 = raw
                    .trim()
                    .parse()
                    .with_context(|| format!("SCORECARD_FRESHNESS_SECS is not a number: '{raw}'"))?;
                anyhow::ensure!(secs >= 0, "SCORECARD_FRESHNESS_SECS must not be negative");
                chrono::Duration::seconds(secs)
            }
            None => defaults.freshness,
        };

        Ok(Self {
            data_dir: non_empty("SCORECARD_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            data_url: non_empty("SCORECARD_DATA_URL"),
            freshness,
            log_file_path: non_empty("LOG_FILE_PATH").unwrap_or(defaults.log_file_path),
        })
    }

    /// Local files win; the URL is only used when the directory is absent.
    pub fn table_source(&self) -> Result<Arc<dyn TableSource>> {
        match &self.data_url {
            Some(url) if !self.data_dir.is_dir() => Ok(Arc::new(HttpSource::from_url(url)?)),
            _ => Ok(Arc::new(DirectorySource::new(&self.data_dir))),
        }
    }
}
