//! Application configuration loaded from environment variables.

use std::path::PathBuf;

use common::{UseCase, UserId};
use orchestration::BusConfig;

/// How log lines are rendered on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Plain,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "plain" | "text" => Some(LogFormat::Plain),
            "json" => Some(LogFormat::Json),
            _ => None,
        }
    }
}

/// The command the runner dispatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppCommand {
    #[default]
    Predict,
    Train,
}

impl AppCommand {
    /// Returns the command's configuration name.
    pub fn as_str(self) -> &'static str {
        match self {
            AppCommand::Predict => "predict",
            AppCommand::Train => "train",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "predict" => Some(AppCommand::Predict),
            "train" => Some(AppCommand::Train),
            _ => None,
        }
    }
}

/// Runner configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
/// - `LOG_FORMAT`: `plain` or `json` (default: `plain`)
/// - `SEED_PATH`: JSON seed file (default: the built-in demo seed)
/// - `APP_COMMAND`: `predict` or `train` (default: `predict`)
/// - `USE_CASE`: use-case to act on (default: `"churn-risk"`)
/// - `USER_ID`: user to predict for (default: `"user-1"`)
/// - `BUS_MAX_RETRIES_PER_ERROR`: see [`BusConfig`]
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub log_level: String,
    pub log_format: LogFormat,
    pub seed_path: Option<PathBuf>,
    pub command: AppCommand,
    pub use_case: UseCase,
    pub user_id: UserId,
    pub bus: BusConfig,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary key lookup.
    ///
    /// Unparseable values fall back to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
            log_format: lookup("LOG_FORMAT")
                .and_then(|v| LogFormat::parse(&v))
                .unwrap_or(defaults.log_format),
            seed_path: lookup("SEED_PATH")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            command: lookup("APP_COMMAND")
                .and_then(|v| AppCommand::parse(&v))
                .unwrap_or(defaults.command),
            use_case: lookup("USE_CASE")
                .map(UseCase::from)
                .unwrap_or(defaults.use_case),
            user_id: lookup("USER_ID")
                .map(UserId::from)
                .unwrap_or(defaults.user_id),
            bus: BusConfig::from_lookup(&lookup),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Plain,
            seed_path: None,
            command: AppCommand::Predict,
            use_case: UseCase::new("churn-risk"),
            user_id: UserId::new("user-1"),
            bus: BusConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_values() {
        let config = Config::from_lookup(|_| None);
        assert_eq!(config, Config::default());
        assert_eq!(config.log_level, "info");
        assert_eq!(config.command, AppCommand::Predict);
        assert_eq!(config.seed_path, None);
    }

    #[test]
    fn test_from_lookup_reads_every_setting() {
        let config = Config::from_lookup(env(&[
            ("RUST_LOG", "debug"),
            ("LOG_FORMAT", "JSON"),
            ("SEED_PATH", "/tmp/seed.json"),
            ("APP_COMMAND", "train"),
            ("USE_CASE", "upsell"),
            ("USER_ID", "user-9"),
            ("BUS_MAX_RETRIES_PER_ERROR", "unbounded"),
        ]));

        assert_eq!(config.log_level, "debug");
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.seed_path, Some(PathBuf::from("/tmp/seed.json")));
        assert_eq!(config.command, AppCommand::Train);
        assert_eq!(config.use_case, UseCase::new("upsell"));
        assert_eq!(config.user_id, UserId::new("user-9"));
        assert_eq!(config.bus, BusConfig::unbounded());
    }

    #[test]
    fn test_unparseable_values_fall_back() {
        let config = Config::from_lookup(env(&[
            ("LOG_FORMAT", "xml"),
            ("APP_COMMAND", "deploy"),
            ("SEED_PATH", "  "),
        ]));

        assert_eq!(config.log_format, LogFormat::Plain);
        assert_eq!(config.command, AppCommand::Predict);
        assert_eq!(config.seed_path, None);
    }
}
