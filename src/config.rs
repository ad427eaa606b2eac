//! Server configuration
//!
//! Loaded from an optional TOML file; every key has a default so a missing
//! file or a partial one is fine. Command-line flags override file values.

use crate::timer::PomodoroSettings;
use anyhow::{Context, Result};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// SQLite database file
    pub database: PathBuf,
    /// TOML snapshot written after every change
    pub snapshot: Option<PathBuf>,
    /// Commit the snapshot on save, pull on start, push on shutdown
    pub sync_git: bool,
    /// Email of the team member acting through this server
    pub current_user: Option<String>,
    /// Default tracing filter when `RUST_LOG` is unset
    pub log_level: String,
    /// Check-ins after this time are recorded as late
    pub workday_start: NaiveTime,
    pub pomodoro: PomodoroSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: PathBuf::from("workboard.sqlite"),
            snapshot: None,
            sync_git: false,
            current_user: None,
            log_level: "info".to_string(),
            workday_start: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN),
            pomodoro: PomodoroSettings::default(),
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config
            .pomodoro
            .validate()
            .map_err(|e| anyhow::anyhow!(e))?;
        Ok(config)
    }

    /// Config for a database path with everything else defaulted
    pub fn for_database(database: impl Into<PathBuf>) -> Self {
        Self {
            database: database.into(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(Config::parse("").unwrap(), Config::default());
    }

    #[test]
    fn test_partial_config() {
        let config = Config::parse(
            r#"
database = "/tmp/board.sqlite"
current_user = "ada@example.com"
workday_start = "08:30:00"

[pomodoro]
work_minutes = 50
"#,
        )
        .unwrap();
        assert_eq!(config.database, PathBuf::from("/tmp/board.sqlite"));
        assert_eq!(config.current_user.as_deref(), Some("ada@example.com"));
        assert_eq!(config.workday_start, NaiveTime::from_hms_opt(8, 30, 0).unwrap());
        assert_eq!(config.pomodoro.work_minutes, 50);
        assert_eq!(config.pomodoro.long_break_every, 4);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_invalid_pomodoro_rejected() {
        assert!(Config::parse("[pomodoro]\nlong_break_every = 0\n").is_err());
        assert!(Config::parse("[pomodoro]\nwork_minutes = 100000\n").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let file = NamedTempFile::new().unwrap();
        fs::write(file.path(), "sync_git = true\n").unwrap();
        let config = Config::load(file.path()).unwrap();
        assert!(config.sync_git);
        assert!(Config::load("/nonexistent/workboard.toml").is_err());
    }
}
