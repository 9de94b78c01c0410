//! HTTP surface modules (router, middleware, handlers).

/// Sign-in, sign-up, profile, and favorites handlers.
pub mod account;
/// Shared constants and header names for HTTP surfaces.
pub mod constants;
/// Problem response helpers and error types.
pub mod errors;
/// Health and metrics endpoints.
pub mod health;
/// Per-request locale, locale switching, and catalog endpoints.
pub mod locale;
/// Page payload handlers.
pub mod pages;
/// Router construction and server host.
pub mod router;
/// Session cookie and guard middleware.
pub mod session;
/// Metrics middleware for HTTP requests.
pub mod telemetry;
