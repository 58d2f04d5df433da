// --- File: crates/calman_common/src/error.rs ---
use std::fmt;
use thiserror::Error;

/// The base error type for everything the HTTP layer can report.
///
/// Each crate extends this by implementing `From<SpecificError> for CalmanError`.
#[derive(Error, Debug)]
pub enum CalmanError {
    /// Error occurred while parsing data
    #[error("Failed to parse data: {0}")]
    ParseError(String),

    /// Error occurred due to missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// No usable credentials for the upstream calendar
    #[error("Authentication error: {0}")]
    AuthError(String),

    /// Error occurred during validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Error occurred during external service call
    #[error("External service error: {service_name} - {message}")]
    ExternalServiceError {
        service_name: String,
        message: String,
    },
}

/// A trait for converting errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for CalmanError {
    fn status_code(&self) -> u16 {
        match self {
            CalmanError::ParseError(_) => 400,
            CalmanError::ConfigError(_) => 500,
            CalmanError::AuthError(_) => 401,
            CalmanError::ValidationError(_) => 400,
            CalmanError::ExternalServiceError { .. } => 502,
        }
    }
}

// Utility functions for error handling
pub fn config_error<T: fmt::Display>(message: T) -> CalmanError {
    CalmanError::ConfigError(message.to_string())
}

pub fn auth_error<T: fmt::Display>(message: T) -> CalmanError {
    CalmanError::AuthError(message.to_string())
}

pub fn validation_error<T: fmt::Display>(message: T) -> CalmanError {
    CalmanError::ValidationError(message.to_string())
}

pub fn external_service_error<T: fmt::Display>(service_name: &str, message: T) -> CalmanError {
    CalmanError::ExternalServiceError {
        service_name: service_name.to_string(),
        message: message.to_string(),
    }
}
