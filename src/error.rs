//! Error types for the dashboard core.
//!
//! Only [`DashboardError::LoadFailure`] crosses into the stores, and it does so
//! as data: reducers record the message in
//! [`StateContainer::error`](crate::StateContainer) instead of propagating it.
//! Every other variant is returned from the edges of the crate (payload
//! decoding, configuration, the live telemetry feed).
//!
//! ## Recovery
//!
//! ```rust
//! use paddock::DashboardError;
//!
//! let error = DashboardError::load_failure("502 Bad Gateway");
//! if error.is_retryable() {
//!     for suggestion in error.recovery_suggestions() {
//!         println!("  - {}", suggestion);
//!     }
//! }
//! ```

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for dashboard operations.
pub type Result<T, E = DashboardError> = std::result::Result<T, E>;

/// Main error type for dashboard operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum DashboardError {
    #[error("Failed to load from API: {message}")]
    LoadFailure { message: String },

    #[error("Parse error in {context}: {details}")]
    Parse { context: String, details: String },

    #[error("Config file error: {path}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Field '{field}' is not a lap time field")]
    FieldNotFound { field: String },

    #[error("Invalid value for '{field}': {reason}")]
    Validation { field: String, reason: String },

    #[error("No telemetry received within {duration:?}")]
    Timeout { duration: Duration },

    #[error("Telemetry provider failed: {reason}")]
    Provider {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl DashboardError {
    /// Returns whether this error is potentially recoverable through retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            DashboardError::LoadFailure { .. } => true,
            DashboardError::Timeout { .. } => true,
            DashboardError::Provider { .. } => true,
            DashboardError::Parse { .. } => false,
            DashboardError::File { .. } => false,
            DashboardError::FieldNotFound { .. } => false,
            DashboardError::Validation { .. } => false,
        }
    }

    /// Returns suggested recovery actions for this error.
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            DashboardError::LoadFailure { .. } => vec![
                "Check the sim rig API is running",
                "Verify the configured API host and port",
                "Dispatch the load intent again",
            ],
            DashboardError::Parse { .. } => vec![
                "Check the API and dashboard versions match",
                "Inspect the raw response body",
            ],
            DashboardError::File { .. } => vec![
                "Check the config file exists and is readable",
                "Check file permissions",
            ],
            DashboardError::FieldNotFound { .. } => vec![
                "Check field name spelling",
                "Use one of the LapField names",
            ],
            DashboardError::Validation { .. } => vec![
                "Fill in every required controller field",
                "Use a dotted IPv4 or IPv6 address",
            ],
            DashboardError::Timeout { .. } => vec![
                "Ensure iRacing is running with a car on track",
                "Increase the wait duration",
            ],
            DashboardError::Provider { .. } => vec![
                "Check the telemetry source is still available",
                "Reconnect the telemetry feed",
            ],
        }
    }

    /// Helper constructor for API load failures.
    pub fn load_failure(message: impl Into<String>) -> Self {
        DashboardError::LoadFailure { message: message.into() }
    }

    /// Helper constructor for parse errors.
    pub fn parse(context: impl Into<String>, details: impl ToString) -> Self {
        DashboardError::Parse { context: context.into(), details: details.to_string() }
    }

    /// Helper constructor for config file errors with path context.
    pub fn file_error(path: PathBuf, source: std::io::Error) -> Self {
        DashboardError::File { path, source }
    }

    /// Helper constructor for validation errors.
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        DashboardError::Validation { field: field.into(), reason: reason.into() }
    }

    /// Helper constructor for provider errors.
    pub fn provider_failed(reason: impl Into<String>) -> Self {
        DashboardError::Provider { reason: reason.into(), source: None }
    }

    /// Helper constructor for provider errors with source.
    pub fn provider_failed_with_source(
        reason: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        DashboardError::Provider { reason: reason.into(), source: Some(source) }
    }
}

impl From<std::io::Error> for DashboardError {
    fn from(err: std::io::Error) -> Self {
        DashboardError::File { path: PathBuf::from("<unknown>"), source: err }
    }
}

impl From<serde_json::Error> for DashboardError {
    fn from(err: serde_json::Error) -> Self {
        DashboardError::parse("JSON payload", err)
    }
}

impl From<serde_yaml_ng::Error> for DashboardError {
    fn from(err: serde_yaml_ng::Error) -> Self {
        DashboardError::parse("YAML config", err)
    }
}
