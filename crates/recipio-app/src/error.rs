//! # Design
//!
//! - Centralize application-level errors for bootstrap.
//! - Keep error messages constant while carrying the failing operation as context.

use thiserror::Error;

/// Result alias for application operations.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("configuration operation failed")]
    Config {
        /// Operation identifier.
        operation: &'static str,
        /// Source configuration error.
        source: recipio_config::ConfigError,
    },
    /// Telemetry setup failed.
    #[error("telemetry operation failed")]
    Telemetry {
        /// Operation identifier.
        operation: &'static str,
        /// Source telemetry error.
        source: recipio_telemetry::TelemetryError,
    },
    /// The backend client could not be constructed.
    #[error("backend client operation failed")]
    Backend {
        /// Operation identifier.
        operation: &'static str,
        /// Source backend client error.
        source: recipio_data::DataError,
    },
    /// The HTTP server failed.
    #[error("api server operation failed")]
    ApiServer {
        /// Operation identifier.
        operation: &'static str,
        /// Source API server error.
        source: recipio_api::ApiServerError,
    },
}

impl AppError {
    pub(crate) const fn config(
        operation: &'static str,
        source: recipio_config::ConfigError,
    ) -> Self {
        Self::Config { operation, source }
    }

    pub(crate) const fn telemetry(
        operation: &'static str,
        source: recipio_telemetry::TelemetryError,
    ) -> Self {
        Self::Telemetry { operation, source }
    }

    pub(crate) const fn backend(operation: &'static str, source: recipio_data::DataError) -> Self {
        Self::Backend { operation, source }
    }

    pub(crate) const fn api_server(
        operation: &'static str,
        source: recipio_api::ApiServerError,
    ) -> Self {
        Self::ApiServer { operation, source }
    }
}
