//! Default values applied when an environment variable is not set.
//!
//! # Design
//! - Centralize fallbacks so the loader and its tests agree on them.

/// Listen address used when `RECIPIO_BIND_ADDR` is unset.
pub const BIND_ADDR: &str = "0.0.0.0";
/// Listen port used when `RECIPIO_HTTP_PORT` is unset.
pub const HTTP_PORT: u16 = 3000;
/// Backend request timeout used when `RECIPIO_BACKEND_TIMEOUT_SECS` is unset.
pub const BACKEND_TIMEOUT_SECS: u64 = 10;
/// Log level used when neither `RECIPIO_LOG_LEVEL` nor `RUST_LOG` is set.
pub const LOG_LEVEL: &str = "info";

/// Environment variable names recognised by the loader.
pub mod env {
    /// Listen address.
    pub const BIND_ADDR: &str = "RECIPIO_BIND_ADDR";
    /// Listen port.
    pub const HTTP_PORT: &str = "RECIPIO_HTTP_PORT";
    /// Path prefix when the site is not served from `/`.
    pub const BASE_PATH: &str = "RECIPIO_BASE_PATH";
    /// Hosted backend project URL.
    pub const BACKEND_URL: &str = "SUPABASE_URL";
    /// Hosted backend public (anon) key.
    pub const BACKEND_ANON_KEY: &str = "SUPABASE_ANON_KEY";
    /// Backend request timeout in seconds.
    pub const BACKEND_TIMEOUT_SECS: &str = "RECIPIO_BACKEND_TIMEOUT_SECS";
    /// Log level.
    pub const LOG_LEVEL: &str = "RECIPIO_LOG_LEVEL";
    /// Log format (`json` or `pretty`).
    pub const LOG_FORMAT: &str = "RECIPIO_LOG_FORMAT";
}
