//! Environment parsing for [`AppConfig`].
//!
//! # Design
//! - All parsing goes through a lookup closure so tests never touch the process environment.
//! - Optional values fall back to [`crate::defaults`] and log the substitution at `debug`.
//! - Required values fail fast with a structured [`ConfigError`].

use std::net::IpAddr;
use std::time::Duration;

use tracing::debug;
use url::Url;

use crate::defaults::{self, env};
use crate::error::{ConfigError, ConfigResult};
use crate::model::{AppConfig, BackendConfig, BasePath, LogSettings};

impl AppConfig {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or any value fails validation.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary key/value lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or any value fails validation.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let bind_addr = match get(env::BIND_ADDR) {
            Some(raw) => raw
                .parse::<IpAddr>()
                .map_err(|_| ConfigError::invalid(env::BIND_ADDR, &raw, "not_an_ip_address"))?,
            None => {
                debug!(name = env::BIND_ADDR, default = defaults::BIND_ADDR, "using default");
                IpAddr::from([0, 0, 0, 0])
            }
        };

        let http_port = match get(env::HTTP_PORT) {
            Some(raw) => parse_port(&raw)?,
            None => {
                debug!(name = env::HTTP_PORT, default = defaults::HTTP_PORT, "using default");
                defaults::HTTP_PORT
            }
        };

        let base_path = get(env::BASE_PATH)
            .map_or_else(|| Ok(BasePath::root()), |raw| BasePath::parse(&raw))?;

        let backend = BackendConfig {
            url: parse_backend_url(get(env::BACKEND_URL))?,
            anon_key: get(env::BACKEND_ANON_KEY).ok_or(ConfigError::Missing {
                name: env::BACKEND_ANON_KEY,
            })?,
            timeout: parse_timeout(get(env::BACKEND_TIMEOUT_SECS))?,
        };

        let logging = LogSettings {
            level: get(env::LOG_LEVEL).unwrap_or_else(|| defaults::LOG_LEVEL.to_string()),
            format: get(env::LOG_FORMAT)
                .map(|raw| parse_log_format(&raw))
                .transpose()?,
        };

        Ok(Self {
            bind_addr,
            http_port,
            base_path,
            backend,
            logging,
        })
    }
}

fn parse_port(raw: &str) -> ConfigResult<u16> {
    let port = raw
        .parse::<u16>()
        .map_err(|_| ConfigError::invalid(env::HTTP_PORT, raw, "out_of_range"))?;
    if port == 0 {
        return Err(ConfigError::invalid(env::HTTP_PORT, raw, "zero"));
    }
    Ok(port)
}

fn parse_backend_url(raw: Option<String>) -> ConfigResult<Url> {
    let raw = raw.ok_or(ConfigError::Missing {
        name: env::BACKEND_URL,
    })?;
    let url =
        Url::parse(&raw).map_err(|_| ConfigError::invalid(env::BACKEND_URL, &raw, "not_a_url"))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::invalid(
            env::BACKEND_URL,
            &raw,
            "unsupported_scheme",
        ));
    }
    Ok(url)
}

fn parse_timeout(raw: Option<String>) -> ConfigResult<Duration> {
    let Some(raw) = raw else {
        return Ok(Duration::from_secs(defaults::BACKEND_TIMEOUT_SECS));
    };
    match raw.parse::<u64>() {
        Ok(0) => Err(ConfigError::invalid(env::BACKEND_TIMEOUT_SECS, &raw, "zero")),
        Ok(secs) => Ok(Duration::from_secs(secs)),
        Err(_) => Err(ConfigError::invalid(
            env::BACKEND_TIMEOUT_SECS,
            &raw,
            "not_an_integer",
        )),
    }
}

fn parse_log_format(raw: &str) -> ConfigResult<String> {
    let lowered = raw.to_ascii_lowercase();
    match lowered.as_str() {
        "json" | "pretty" => Ok(lowered),
        _ => Err(ConfigError::invalid(env::LOG_FORMAT, raw, "unknown_format")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    const REQUIRED: [(&str, &str); 2] = [
        (env::BACKEND_URL, "https://project.supabase.co"),
        (env::BACKEND_ANON_KEY, "anon-key"),
    ];

    #[test]
    fn defaults_apply_when_optional_values_missing() -> ConfigResult<()> {
        let config = AppConfig::from_lookup(lookup(&REQUIRED))?;
        assert_eq!(config.bind_addr, IpAddr::from([0, 0, 0, 0]));
        assert_eq!(config.http_port, defaults::HTTP_PORT);
        assert!(config.base_path.is_root());
        assert_eq!(
            config.backend.timeout,
            Duration::from_secs(defaults::BACKEND_TIMEOUT_SECS)
        );
        assert_eq!(config.logging.level, "info");
        assert!(config.logging.format.is_none());
        Ok(())
    }

    #[test]
    fn explicit_values_are_parsed() -> ConfigResult<()> {
        let mut pairs = REQUIRED.to_vec();
        pairs.extend([
            (env::BIND_ADDR, "127.0.0.1"),
            (env::HTTP_PORT, "8080"),
            (env::BASE_PATH, "/tarifler/"),
            (env::BACKEND_TIMEOUT_SECS, "3"),
            (env::LOG_FORMAT, "JSON"),
        ]);
        let config = AppConfig::from_lookup(lookup(&pairs))?;
        assert_eq!(config.bind_addr, IpAddr::from([127, 0, 0, 1]));
        assert_eq!(config.http_port, 8080);
        assert_eq!(config.base_path.as_str(), "/tarifler");
        assert_eq!(config.backend.timeout, Duration::from_secs(3));
        assert_eq!(config.logging.format.as_deref(), Some("json"));
        Ok(())
    }

    #[test]
    fn missing_backend_settings_are_reported() {
        let err = AppConfig::from_lookup(lookup(&[])).err();
        assert_eq!(
            err,
            Some(ConfigError::Missing {
                name: env::BACKEND_URL
            })
        );

        let err = AppConfig::from_lookup(lookup(&REQUIRED[..1])).err();
        assert_eq!(
            err,
            Some(ConfigError::Missing {
                name: env::BACKEND_ANON_KEY
            })
        );
    }

    #[test]
    fn invalid_values_are_rejected() {
        for (name, value) in [
            (env::HTTP_PORT, "0"),
            (env::HTTP_PORT, "70000"),
            (env::BIND_ADDR, "localhost"),
            (env::BACKEND_URL, "ftp://example.com"),
            (env::BACKEND_TIMEOUT_SECS, "0"),
            (env::LOG_FORMAT, "xml"),
        ] {
            let mut pairs = REQUIRED.to_vec();
            pairs.push((name, value));
            let result = AppConfig::from_lookup(lookup(&pairs));
            assert!(
                matches!(result, Err(ConfigError::InvalidField { field, .. }) if field == name),
                "{name}={value} should be rejected"
            );
        }
    }

    #[test]
    fn blank_values_count_as_unset() -> ConfigResult<()> {
        let mut pairs = REQUIRED.to_vec();
        pairs.push((env::HTTP_PORT, "   "));
        let config = AppConfig::from_lookup(lookup(&pairs))?;
        assert_eq!(config.http_port, defaults::HTTP_PORT);
        Ok(())
    }
}
