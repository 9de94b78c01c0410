//! Typed configuration models.

use std::net::IpAddr;
use std::time::Duration;

use url::Url;

use crate::error::{ConfigError, ConfigResult};

/// Fully resolved application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Interface the HTTP listener binds to.
    pub bind_addr: IpAddr,
    /// Port the HTTP listener binds to.
    pub http_port: u16,
    /// Prefix applied to cookie paths and reload targets.
    pub base_path: BasePath,
    /// Hosted backend connection settings.
    pub backend: BackendConfig,
    /// Logging preferences.
    pub logging: LogSettings,
}

/// Connection settings for the hosted backend-as-a-service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    /// Project base URL (data API lives under `/rest/v1`, auth under `/auth/v1`).
    pub url: Url,
    /// Public key sent as `apikey` on every request.
    pub anon_key: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

/// Logging preferences handed to the telemetry crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    /// Default filter directive when `RUST_LOG` is absent.
    pub level: String,
    /// Explicit output format (`json` or `pretty`); inferred when `None`.
    pub format: Option<String>,
}

/// Site path prefix, normalised to either the empty string (root) or `/segment[/segment]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BasePath(String);

impl BasePath {
    /// The site root.
    #[must_use]
    pub const fn root() -> Self {
        Self(String::new())
    }

    /// Normalise a raw prefix: adds a leading slash, strips trailing slashes,
    /// and treats `""` and `"/"` as the root.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidField`] if the value carries whitespace,
    /// a query, or a fragment.
    pub fn parse(raw: &str) -> ConfigResult<Self> {
        let trimmed = raw.trim();
        if trimmed
            .chars()
            .any(|ch| ch.is_whitespace() || ch == '?' || ch == '#')
        {
            return Err(ConfigError::invalid(
                crate::defaults::env::BASE_PATH,
                raw,
                "invalid_characters",
            ));
        }
        let stripped = trimmed.trim_matches('/');
        if stripped.is_empty() {
            return Ok(Self::root());
        }
        if stripped.contains("//") {
            return Err(ConfigError::invalid(
                crate::defaults::env::BASE_PATH,
                raw,
                "empty_segment",
            ));
        }
        Ok(Self(format!("/{stripped}")))
    }

    /// Normalised prefix; empty for the root.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the site is served from `/`.
    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Path attribute for site-wide cookies.
    #[must_use]
    pub fn cookie_path(&self) -> &str {
        if self.is_root() { "/" } else { &self.0 }
    }

    /// Prefix an absolute site path with the base path.
    #[must_use]
    pub fn join(&self, path: &str) -> String {
        let path = if path.is_empty() { "/" } else { path };
        format!("{}{path}", self.0)
    }
}
