//! Errors surfaced by recipe and account collaborators.

use std::error::Error as StdError;

use thiserror::Error;

/// Failures reported through [`crate::RecipeSource`] and [`crate::AccountSource`].
///
/// Missing data is never an error here; lookups return `Option` or empty lists.
#[derive(Debug, Error)]
pub enum RecipeError {
    /// Email/password pair was rejected.
    #[error("invalid credentials")]
    InvalidCredentials,
    /// The account exists but its email address is not confirmed yet.
    #[error("email confirmation required")]
    EmailConfirmationRequired,
    /// The backend refused to create the account.
    #[error("registration rejected")]
    RegistrationRejected {
        /// Backend-provided explanation.
        reason: String,
    },
    /// A sign-in link code was unknown, expired, or already used.
    #[error("auth code rejected")]
    AuthCodeRejected {
        /// Backend-provided explanation.
        reason: String,
    },
    /// The backend could not be reached or answered unexpectedly.
    #[error("backend request failed")]
    Backend {
        /// Operation that failed.
        operation: &'static str,
        /// Underlying transport or decode error.
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
}

impl RecipeError {
    /// Wrap a transport failure for `operation`.
    pub fn backend<E>(operation: &'static str, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::Backend {
            operation,
            source: Box::new(source),
        }
    }

    /// Operation label for backend failures.
    #[must_use]
    pub const fn operation(&self) -> Option<&'static str> {
        match self {
            Self::Backend { operation, .. } => Some(*operation),
            _ => None,
        }
    }
}

/// Convenience alias for collaborator results.
pub type RecipeResult<T> = Result<T, RecipeError>;
