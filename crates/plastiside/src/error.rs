use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

/// Process-level failures raised while bootstrapping or running the
/// service. Domain failures carry their own taxonomies and never reach
/// this type.
#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Domain(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Domain(err) => write!(f, "domain error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Domain(err) => Some(&**err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.to_string() }));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
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

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<crate::rewards::StoreError> for AppError {
    fn from(value: crate::rewards::StoreError) -> Self {
        Self::Domain(Box::new(value))
    }
}

impl From<crate::rewards::LedgerError> for AppError {
    fn from(value: crate::rewards::LedgerError) -> Self {
        Self::Domain(Box::new(value))
    }
}

impl From<crate::rewards::VerificationError> for AppError {
    fn from(value: crate::rewards::VerificationError) -> Self {
        Self::Domain(Box::new(value))
    }
}

impl From<crate::rewards::AnalyticsError> for AppError {
    fn from(value: crate::rewards::AnalyticsError) -> Self {
        Self::Domain(Box::new(value))
    }
}

impl From<crate::rewards::DirectoryError> for AppError {
    fn from(value: crate::rewards::DirectoryError) -> Self {
        Self::Domain(Box::new(value))
    }
}

impl From<crate::rewards::SettingsError> for AppError {
    fn from(value: crate::rewards::SettingsError) -> Self {
        Self::Domain(Box::new(value))
    }
}

impl From<crate::rewards::BlobError> for AppError {
    fn from(value: crate::rewards::BlobError) -> Self {
        Self::Domain(Box::new(value))
    }
}
