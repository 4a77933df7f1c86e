//! Tracing subscriber setup.
//!
//! The library only emits `tracing` events; installing a subscriber is left to
//! the application. [`init_tracing`] is a convenience for applications and
//! tests that want the usual `fmt` subscriber.

use crate::config::LoggingConfig;
use crate::errors::ModelkitError;
use tracing_subscriber::EnvFilter;

/// Installs a global `fmt` subscriber configured by `config`.
///
/// Fails if the filter directive is invalid or a global subscriber is
/// already installed.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), ModelkitError> {
    let filter = build_filter(config)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|err| ModelkitError::Config(format!("Failed to install subscriber: {err}")))
}

/// Parses the filter directive from `config`.
pub fn build_filter(config: &LoggingConfig) -> Result<EnvFilter, ModelkitError> {
    EnvFilter::try_new(&config.filter)
        .map_err(|err| ModelkitError::Config(format!("Invalid log filter '{}': {err}", config.filter)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filter_accepts_directives() {
        let config = LoggingConfig::default().with_filter("modelkit=debug,warn");
        assert!(build_filter(&config).is_ok());
    }

    #[test]
    fn test_build_filter_rejects_invalid() {
        let config = LoggingConfig::default().with_filter("modelkit=notalevel");
        let err = build_filter(&config).unwrap_err();
        assert!(matches!(err, ModelkitError::Config(_)));
    }
}
