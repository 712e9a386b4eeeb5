use crate::config::TelemetryConfig;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("APP_LOG_LEVEL '{value}' is not a valid tracing filter")]
    Filter {
        value: String,
        #[source]
        source: ParseError,
    },
    #[error("tracing subscriber already installed: {0}")]
    Subscriber(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Filter for a configured level such as `info` or `pet_adoption=debug,warn`.
pub fn level_filter(level: &str) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(level).map_err(|source| TelemetryError::Filter {
        value: level.to_string(),
        source,
    })
}

/// Install the global subscriber. `RUST_LOG` takes precedence over `APP_LOG_LEVEL`.
///
/// Logs go to stderr; stdout carries console feedback and CLI output.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => level_filter(&config.log_level)?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::Subscriber)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_levels_and_crate_directives() {
        for level in ["info", "warn", "pet_adoption=debug,warn"] {
            assert!(level_filter(level).is_ok(), "{level} should parse");
        }
    }

    #[test]
    fn rejects_malformed_levels_with_the_offending_value() {
        match level_filter("pet_adoption=loud") {
            Err(TelemetryError::Filter { value, .. }) => assert_eq!(value, "pet_adoption=loud"),
            other => panic!("expected filter error, got {other:?}"),
        }
    }
}
