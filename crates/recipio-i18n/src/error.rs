//! Error types for locale handling.

use thiserror::Error;

use crate::locale::Locale;

/// Errors raised while reading catalogs or touching cookie storage.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum I18nError {
    /// A locale code outside the supported set was supplied.
    #[error("unsupported locale")]
    UnsupportedLocale {
        /// Raw value that failed to parse.
        value: String,
    },
    /// Cookie storage could not be reached (no request scope, poisoned lock).
    #[error("cookie store unavailable")]
    CookieStoreUnavailable {
        /// Machine-readable reason for the failure.
        reason: &'static str,
    },
    /// An embedded message catalog failed to parse.
    #[error("message catalog invalid")]
    CatalogInvalid {
        /// Locale whose catalog failed.
        locale: Locale,
        /// Parser diagnostic.
        detail: String,
    },
}

/// Convenience alias for locale results.
pub type I18nResult<T> = Result<T, I18nError>;
