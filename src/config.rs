use crate::{
    configuration::*,
    products::{policy::AlertPolicy, unexpected::ConfigError},
    utilities::read_text_file,
};
use serde::{Deserialize, Serialize};
use std::{
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::level_filters::LevelFilter;


#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
/// Dynamic configuration read on demand by Certwarden
pub struct Config {
    /// Glob pattern of domain list files (JSON arrays or plain text lists)
    pub domains: Option<String>,

    /// Destination of the published status report
    pub status_file: Option<String>,

    /// Log level for Certwarden
    pub log_level: Option<String>,

    /// Timeout of a single certificate probe, in seconds
    pub probe_timeout: Option<u64>,

    /// Certificates valid for fewer days are reported as expiring soon
    pub threshold_days: Option<i64>,

    /// Exact days-left values that trigger a notification
    pub exact_day_triggers: Option<Vec<i64>>,

    /// Always notify about expired and unreachable certificates
    pub always_alert_failures: Option<bool>,

    /// Upper bound of concurrently running probes (unbounded when unset)
    pub max_in_flight: Option<usize>,

    /// List of named notifiers
    pub notifiers: Option<Vec<Notifiers>>,

    /// Failure emoji used for notifications
    pub failure_emoji: Option<String>,

    /// Name notifications are posted with
    pub bot_name: Option<String>,
}


#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
/// Defines a notifier used to deliver alerts
pub struct Notifiers {
    /// Notifier unique name
    pub name: String,

    /// Notifier slack webhook
    pub slack_webhook: String,
}


impl Config {
    /// Load Certwarden configuration from the first existing config path.
    /// Default configuration when none of them exists
    pub fn load() -> Result<Config, ConfigError> {
        Config::load_first(&CONFIG_PATHS)
    }


    /// Load configuration from the first existing of given paths
    pub fn load_first<P: AsRef<Path>>(paths: &[P]) -> Result<Config, ConfigError> {
        match paths.iter().find(|file| file.as_ref().exists()) {
            Some(config) => Config::load_from(config),
            None => Ok(Config::default()),
        }
    }


    /// Load configuration from given file
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let path = path.as_ref();
        let contents = read_text_file(path).map_err(|source| {
            ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }
        })?;
        serde_json::from_str(&contents).map_err(|source| {
            ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }
        })
    }


    /// Glob pattern of domain list files
    pub fn domains_pattern(&self) -> String {
        self.domains
            .clone()
            .unwrap_or_else(|| String::from(DEFAULT_DOMAINS_PATTERN))
    }


    /// Path of the published status report
    pub fn status_file(&self) -> PathBuf {
        PathBuf::from(
            self.status_file
                .as_deref()
                .unwrap_or(DEFAULT_STATUS_FILE),
        )
    }


    /// Timeout of a single probe
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout.unwrap_or(CHECK_TIMEOUT).max(1))
    }


    /// Alert policy built from configured thresholds and triggers
    pub fn policy(&self) -> AlertPolicy {
        AlertPolicy::new(
            self.threshold_days
                .unwrap_or(CHECK_MINIMUM_DAYS_OF_TLSCERT_VALIDITY),
        )
        .with_triggers(self.exact_day_triggers.clone().unwrap_or_default())
        .always_alert_failures(self.always_alert_failures.unwrap_or(true))
    }


    /// Get LevelFilter (log level) from configuration
    pub fn get_log_level(&self) -> LevelFilter {
        let level = self.log_level.clone().unwrap_or_default().to_uppercase();
        match &level[..] {
            "OFF" => LevelFilter::OFF,
            "ERROR" => LevelFilter::ERROR,
            "WARN" => LevelFilter::WARN,
            "INFO" => LevelFilter::INFO,
            "DEBUG" => LevelFilter::DEBUG,
            "TRACE" => LevelFilter::TRACE,
            _ => LevelFilter::INFO,
        }
    }
}
