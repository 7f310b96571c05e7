mod assistant;
mod datastore;
mod observability;
mod secrets;
mod server;

pub use assistant::*;
pub use datastore::*;
pub use observability::*;
pub use secrets::*;
pub use server::*;

use serde::{Deserialize, Serialize};
use std::fmt;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Top-level config
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub secrets: SecretsConfig,
    #[serde(default)]
    pub datastore: DatastoreConfig,
    #[serde(default)]
    pub assistant: AssistantConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Config validation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Severity level for a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSeverity {
    Error,
    Warning,
}

/// A single configuration validation issue.
#[derive(Debug, Clone)]
pub struct ConfigError {
    pub severity: ConfigSeverity,
    pub field: String,
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            ConfigSeverity::Error => "ERROR",
            ConfigSeverity::Warning => "WARN",
        };
        write!(f, "[{tag}] {}: {}", self.field, self.message)
    }
}

impl Config {
    /// Validate the configuration and return a list of issues.
    ///
    /// Returns an empty vec when everything looks good.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let mut error = |field: &str, message: &str| {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: field.into(),
                message: message.into(),
            });
        };

        if self.server.port == 0 {
            error("server.port", "port must be greater than 0");
        }
        if self.server.host.is_empty() {
            error("server.host", "host must not be empty");
        }

        for (field, name) in [
            ("secrets.assistant_api_key", &self.secrets.assistant_api_key),
            ("secrets.datastore_api_key", &self.secrets.datastore_api_key),
            ("secrets.datastore_base_id", &self.secrets.datastore_base_id),
        ] {
            if name.is_empty() {
                error(field, "secret name must not be empty");
            }
        }
        if self.secrets.region.is_empty() {
            error("secrets.region", "region must not be empty");
        }

        if self.datastore.base_url.is_empty() {
            error("datastore.base_url", "base_url must not be empty");
        }
        if self.datastore.assistants_table.is_empty() {
            error("datastore.assistants_table", "table name must not be empty");
        }
        if self.datastore.transcripts_table.is_empty() {
            error("datastore.transcripts_table", "table name must not be empty");
        }

        if self.assistant.base_url.is_empty() {
            error("assistant.base_url", "base_url must not be empty");
        }
        if self.assistant.poll_interval_ms == 0 {
            error("assistant.poll_interval_ms", "poll interval must be greater than 0");
        }
        if self.assistant.run_timeout_secs == 0 {
            error("assistant.run_timeout_secs", "run timeout must be greater than 0");
        }

        if !(0.0..=1.0).contains(&self.observability.sample_rate) {
            errors.push(ConfigError {
                severity: ConfigSeverity::Warning,
                field: "observability.sample_rate".into(),
                message: "sample_rate outside 0.0..=1.0 is clamped by the exporter".into(),
            });
        }

        errors
    }

    /// `true` when [`Config::validate`] reports no `Error`-severity issue.
    pub fn is_valid(&self) -> bool {
        self.validate()
            .iter()
            .all(|e| e.severity != ConfigSeverity::Error)
    }
}
