//! Configuration for queues and logging.

use crate::errors::ModelkitError;
use serde::{Deserialize, Serialize};

/// Environment variable naming the default queue.
pub const ENV_QUEUE: &str = "MODELKIT_QUEUE";
/// Environment variable holding the log filter directive.
pub const ENV_LOG: &str = "MODELKIT_LOG";
/// Environment variable switching log output to JSON.
pub const ENV_LOG_JSON: &str = "MODELKIT_LOG_JSON";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelkitConfig {
    /// Queue settings.
    #[serde(default)]
    pub queue: QueueConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ModelkitConfig {
    /// Creates a configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a configuration from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ModelkitError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Builds a configuration from `MODELKIT_*` environment variables.
    pub fn from_env() -> Result<Self, ModelkitError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ModelkitError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(name) = lookup(ENV_QUEUE) {
            config.queue.name = name;
        }
        if let Some(filter) = lookup(ENV_LOG) {
            config.logging.filter = filter;
        }
        if let Some(json) = lookup(ENV_LOG_JSON) {
            config.logging.json = parse_flag(ENV_LOG_JSON, &json)?;
        }

        Ok(config)
    }

    /// Sets the queue configuration.
    #[must_use]
    pub fn with_queue(mut self, queue: QueueConfig) -> Self {
        self.queue = queue;
        self
    }

    /// Sets the logging configuration.
    #[must_use]
    pub fn with_logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = logging;
        self
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool, ModelkitError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(ModelkitError::Config(format!(
            "{key} must be a boolean, got '{other}'"
        ))),
    }
}

/// Configuration for task queues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Queue name reported in acknowledgements and logs.
    #[serde(default = "default_queue_name")]
    pub name: String,
    /// Maximum number of failed jobs remembered.
    #[serde(default = "default_max_failed_jobs")]
    pub max_failed_jobs: usize,
    /// Maximum number of push acknowledgements an in-memory queue keeps.
    #[serde(default = "default_max_pushed_acks")]
    pub max_pushed_acks: usize,
}

fn default_queue_name() -> String {
    "default".to_string()
}

fn default_max_failed_jobs() -> usize {
    crate::queue::DEFAULT_MAX_FAILED_JOBS
}

fn default_max_pushed_acks() -> usize {
    crate::queue::DEFAULT_MAX_PUSHED_ACKS
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            name: default_queue_name(),
            max_failed_jobs: default_max_failed_jobs(),
            max_pushed_acks: default_max_pushed_acks(),
        }
    }
}

impl QueueConfig {
    /// Creates a queue configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the queue name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the failure log size.
    #[must_use]
    pub fn with_max_failed_jobs(mut self, max: usize) -> Self {
        self.max_failed_jobs = max;
        self
    }

    /// Sets how many push acknowledgements an in-memory queue keeps.
    #[must_use]
    pub fn with_max_pushed_acks(mut self, max: usize) -> Self {
        self.max_pushed_acks = max;
        self
    }
}

/// Configuration for the tracing subscriber.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `modelkit=debug`.
    #[serde(default = "default_filter")]
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

fn default_filter() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            json: false,
        }
    }
}

impl LoggingConfig {
    /// Sets the filter directive.
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    /// Enables or disables JSON output.
    #[must_use]
    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }
}
