use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::adoption::{FormError, FormTemplateImportError, MediatorError};
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Adoption(MediatorError),
    Template(FormTemplateImportError),
    Form(FormError),
    Render(serde_json::Error),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Adoption(err) => write!(f, "adoption error: {}", err),
            AppError::Template(err) => write!(f, "template error: {}", err),
            AppError::Form(err) => write!(f, "form error: {}", err),
            AppError::Render(err) => write!(f, "render error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Adoption(err) => Some(err),
            AppError::Template(err) => Some(err),
            AppError::Form(err) => Some(err),
            AppError::Render(err) => Some(err),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<MediatorError> for AppError {
    fn from(value: MediatorError) -> Self {
        Self::Adoption(value)
    }
}

impl From<FormTemplateImportError> for AppError {
    fn from(value: FormTemplateImportError) -> Self {
        Self::Template(value)
    }
}

impl From<FormError> for AppError {
    fn from(value: FormError) -> Self {
        Self::Form(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Render(value)
    }
}
