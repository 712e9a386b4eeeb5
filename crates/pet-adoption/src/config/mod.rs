use std::env;
use std::fmt;
use std::path::PathBuf;

/// Distinguishes runtime behavior for different stages of the program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub telemetry: TelemetryConfig,
    pub feedback: FeedbackConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let sink = match env::var("APP_FEEDBACK_SINK") {
            Ok(raw) => FeedbackSinkKind::parse(&raw)?,
            Err(_) => FeedbackSinkKind::Console,
        };
        let log_path = env::var("APP_FEEDBACK_LOG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_FEEDBACK_LOG));

        Ok(Self {
            environment,
            telemetry: TelemetryConfig { log_level },
            feedback: FeedbackConfig { sink, log_path },
        })
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

pub const DEFAULT_FEEDBACK_LOG: &str = "feedback_log.txt";

/// Where denial feedback is delivered.
#[derive(Debug, Clone)]
pub struct FeedbackConfig {
    pub sink: FeedbackSinkKind,
    pub log_path: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackSinkKind {
    Console,
    File,
}

impl FeedbackSinkKind {
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "console" | "stdout" => Ok(Self::Console),
            "file" | "log" => Ok(Self::File),
            _ => Err(ConfigError::InvalidFeedbackSink {
                value: value.to_string(),
            }),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidFeedbackSink { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidFeedbackSink { value } => write!(
                f,
                "APP_FEEDBACK_SINK must be 'console' or 'file' (found '{}')",
                value
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("APP_FEEDBACK_SINK");
        env::remove_var("APP_FEEDBACK_LOG");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.feedback.sink, FeedbackSinkKind::Console);
        assert_eq!(config.feedback.log_path, PathBuf::from(DEFAULT_FEEDBACK_LOG));
    }

    #[test]
    fn selects_file_sink_from_env() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_ENV", "prod");
        env::set_var("APP_FEEDBACK_SINK", "File");
        env::set_var("APP_FEEDBACK_LOG", "/tmp/shelter-feedback.txt");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.environment, AppEnvironment::Production);
        assert_eq!(config.feedback.sink, FeedbackSinkKind::File);
        assert_eq!(
            config.feedback.log_path,
            PathBuf::from("/tmp/shelter-feedback.txt")
        );
        reset_env();
    }

    #[test]
    fn rejects_unknown_feedback_sink() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_FEEDBACK_SINK", "carrier-pigeon");
        match AppConfig::load() {
            Err(ConfigError::InvalidFeedbackSink { value }) => {
                assert_eq!(value, "carrier-pigeon")
            }
            other => panic!("expected invalid sink error, got {other:?}"),
        }
        reset_env();
    }
}
