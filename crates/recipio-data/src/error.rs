//! Error types for the backend client.

use std::error::Error;
use std::fmt::{self, Display, Formatter};

use recipio_recipes::RecipeError;

/// Result alias for backend client operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors raised while talking to the hosted backend.
#[derive(Debug)]
pub enum DataError {
    /// The HTTP client could not be constructed.
    ClientBuild {
        /// Underlying reqwest error.
        source: reqwest::Error,
    },
    /// An endpoint URL could not be derived from the configured base URL.
    InvalidUrl {
        /// Operation identifier.
        operation: &'static str,
        /// Underlying parse error.
        source: url::ParseError,
    },
    /// The request could not be sent or the response body not read.
    Transport {
        /// Operation identifier.
        operation: &'static str,
        /// Underlying reqwest error.
        source: reqwest::Error,
    },
    /// The backend answered with an unexpected status.
    Status {
        /// Operation identifier.
        operation: &'static str,
        /// HTTP status code.
        status: u16,
        /// Response body, truncated.
        body: String,
    },
    /// The response body did not match the expected shape.
    Decode {
        /// Operation identifier.
        operation: &'static str,
        /// Underlying serde error.
        source: serde_json::Error,
    },
}

impl DataError {
    /// Operation the error is attributed to.
    #[must_use]
    pub const fn operation(&self) -> &'static str {
        match self {
            Self::ClientBuild { .. } => "client_build",
            Self::InvalidUrl { operation, .. }
            | Self::Transport { operation, .. }
            | Self::Status { operation, .. }
            | Self::Decode { operation, .. } => *operation,
        }
    }
}

impl Display for DataError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::ClientBuild { .. } => formatter.write_str("failed to build backend client"),
            Self::InvalidUrl { .. } => formatter.write_str("invalid backend endpoint"),
            Self::Transport { .. } => formatter.write_str("backend request failed"),
            Self::Status { .. } => formatter.write_str("backend returned an error status"),
            Self::Decode { .. } => formatter.write_str("backend response was malformed"),
        }
    }
}

impl Error for DataError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::ClientBuild { source } | Self::Transport { source, .. } => Some(source),
            Self::InvalidUrl { source, .. } => Some(source),
            Self::Decode { source, .. } => Some(source),
            Self::Status { .. } => None,
        }
    }
}

impl From<DataError> for RecipeError {
    fn from(err: DataError) -> Self {
        Self::backend(err.operation(), err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_error_display_and_source() {
        let status = DataError::Status {
            operation: "recipe_detail",
            status: 503,
            body: "unavailable".to_string(),
        };
        assert_eq!(status.to_string(), "backend returned an error status");
        assert!(status.source().is_none());
        assert_eq!(status.operation(), "recipe_detail");

        let decode = DataError::Decode {
            operation: "public_recipes",
            source: serde_json::from_str::<u8>("x").err().unwrap_or_else(|| {
                serde_json::Error::io(std::io::Error::other("decode"))
            }),
        };
        assert_eq!(decode.to_string(), "backend response was malformed");
        assert!(decode.source().is_some());

        let url = DataError::InvalidUrl {
            operation: "categories",
            source: url::ParseError::EmptyHost,
        };
        assert_eq!(url.to_string(), "invalid backend endpoint");
    }

    #[test]
    fn converts_into_recipe_backend_error() {
        let err: RecipeError = DataError::Status {
            operation: "favorites",
            status: 500,
            body: String::new(),
        }
        .into();
        assert_eq!(err.operation(), Some("favorites"));
    }
}
