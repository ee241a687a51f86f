//! Board configuration.
//!
//! # Responsibility
//! - Load logging and form rule settings from a JSON file.
//! - Supply defaults for every field that is omitted.
//!
//! # Invariants
//! - A loaded config always has satisfiable form rules.

use crate::validation::FormRules;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration load errors.
#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(serde_json::Error),
    InvalidRules(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config JSON: {err}"),
            Self::InvalidRules(message) => write!(f, "invalid form rules: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::InvalidRules(_) => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Top-level board settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// `trace|debug|info|warn|error`; build-mode default when unset.
    pub log_level: Option<String>,
    /// Absolute directory for rotating log files; stderr when unset.
    pub log_dir: Option<PathBuf>,
    pub rules: FormRules,
}

impl BoardConfig {
    pub fn from_json_str(raw: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config
            .rules
            .validate_bounds()
            .map_err(ConfigError::InvalidRules)?;
        Ok(config)
    }

    pub fn load(path: &Path) -> ConfigResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::{BoardConfig, ConfigError};
    use std::path::PathBuf;

    #[test]
    fn empty_object_uses_defaults() {
        let config = BoardConfig::from_json_str("{}").expect("empty config");
        assert_eq!(config, BoardConfig::default());
        assert_eq!(config.rules.description_min_length, 5);
        assert_eq!(config.rules.assignee_max, 5);
    }

    #[test]
    fn partial_rules_merge_with_defaults() {
        let config = BoardConfig::from_json_str(
            r#"{ "log_level": "debug", "rules": { "assignee_max": 9 } }"#,
        )
        .expect("partial config");
        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert_eq!(config.rules.assignee_min, 1);
        assert_eq!(config.rules.assignee_max, 9);
    }

    #[test]
    fn rejects_unsatisfiable_rules() {
        let err = BoardConfig::from_json_str(
            r#"{ "rules": { "assignee_min": 4, "assignee_max": 2 } }"#,
        )
        .expect_err("inverted bounds must fail");
        assert!(matches!(err, ConfigError::InvalidRules(_)));
    }

    #[test]
    fn load_reads_file_and_reports_missing_path() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("board.json");
        std::fs::write(&path, r#"{ "log_dir": "/var/log/taskboard" }"#).expect("write config");

        let config = BoardConfig::load(&path).expect("config file");
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/taskboard")));

        let err = BoardConfig::load(&dir.path().join("missing.json"))
            .expect_err("missing file must fail");
        assert!(err.to_string().contains("missing.json"));
    }
}
