//! Users, sessions, and the client-side sign-up rules.

use serde::{Deserialize, Serialize};

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Authenticated user as reported by the auth backend.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Backend user identifier.
    pub id: String,
    /// Primary email.
    #[serde(default)]
    pub email: Option<String>,
    /// Full name from user metadata.
    #[serde(default)]
    pub full_name: Option<String>,
    /// Chosen display name from user metadata.
    #[serde(default)]
    pub display_name: Option<String>,
}

/// A signed-in user plus the bearer token that proves it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    /// Bearer token for backend calls on the user's behalf.
    pub access_token: String,
    /// The signed-in user.
    pub user: UserProfile,
}

/// Email/password login.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

/// New account request.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Registration {
    /// Account email.
    pub email: String,
    /// Chosen password.
    pub password: String,
    /// Optional display name stored in user metadata.
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Result of a successful sign-up call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SignUpOutcome {
    /// The account is active and a session was issued.
    SignedIn(Session),
    /// The account must confirm its email before signing in.
    ConfirmationRequired,
}

/// Reason a password was rejected before reaching the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PasswordIssue {
    /// Shorter than [`MIN_PASSWORD_LEN`].
    TooShort,
    /// Confirmation differs from the password.
    Mismatch,
}

impl PasswordIssue {
    /// Message catalog key describing the issue.
    #[must_use]
    pub const fn message_key(self) -> &'static str {
        match self {
            Self::TooShort => "Auth.passwordTooShort",
            Self::Mismatch => "Auth.passwordMismatch",
        }
    }
}

/// Check a new password and its confirmation.
///
/// # Errors
///
/// Returns the first [`PasswordIssue`] found; length is checked before the match.
pub fn validate_password(password: &str, confirmation: &str) -> Result<(), PasswordIssue> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(PasswordIssue::TooShort);
    }
    if password != confirmation {
        return Err(PasswordIssue::Mismatch);
    }
    Ok(())
}

/// Name shown on the profile: full name, display name, the email's local part,
/// then the whole email.
#[must_use]
pub fn display_name(user: &UserProfile) -> Option<String> {
    let non_blank = |value: Option<&str>| {
        value
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(ToString::to_string)
    };
    let email = user.email.as_deref();
    non_blank(user.full_name.as_deref())
        .or_else(|| non_blank(user.display_name.as_deref()))
        .or_else(|| non_blank(email.and_then(|email| email.split('@').next())))
        .or_else(|| non_blank(email))
}
