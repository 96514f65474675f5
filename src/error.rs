//! Unified error types for the tutorial API service.
//!
//! Request-level failures are modelled by [`crate::api::ApiError`], which maps
//! straight onto HTTP responses. [`AppError`] covers everything that can go
//! wrong while the service is starting up.

use thiserror::Error;

/// Unified error type for service startup and configuration.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Configuration loaded but failed semantic validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Listen address could not be parsed.
    #[error("invalid listen address {addr}: {reason}")]
    InvalidAddress {
        /// The address that failed to parse.
        addr: String,
        /// Reason for failure.
        reason: String,
    },

    /// Prometheus recorder could not be installed.
    #[error("metrics error: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, AppError>;
