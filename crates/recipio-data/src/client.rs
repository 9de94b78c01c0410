//! HTTP plumbing shared by the data and auth operations.
//!
//! # Design
//! - Every request carries the project's public key as `apikey`; the bearer
//!   token is the public key for anonymous reads and the user's access token
//!   for library operations.
//! - Non-2xx answers become [`DataError::Status`] unless the caller inspects
//!   the response itself.
//! - Each call records its latency, and failures are counted by operation.

use std::time::Instant;

use recipio_config::BackendConfig;
use recipio_telemetry::{Metrics, current_request};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::error::{DataError, Result};

pub(crate) const HEADER_API_KEY: &str = "apikey";
const BODY_EXCERPT_LEN: usize = 512;

/// Client for the hosted backend's data (`/rest/v1`) and auth (`/auth/v1`) APIs.
#[derive(Clone)]
pub struct SupabaseClient {
    pub(crate) http: Client,
    base_url: Url,
    anon_key: String,
    metrics: Metrics,
}

impl SupabaseClient {
    /// Build a client from backend settings.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::ClientBuild`] if the HTTP client cannot be created.
    pub fn new(config: &BackendConfig, metrics: Metrics) -> Result<Self> {
        let mut default_headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_str(&config.anon_key) {
            default_headers.insert(HEADER_API_KEY, value);
        }
        let http = Client::builder()
            .timeout(config.timeout)
            .default_headers(default_headers)
            .build()
            .map_err(|source| DataError::ClientBuild { source })?;
        Ok(Self {
            http,
            base_url: with_trailing_slash(config.url.clone()),
            anon_key: config.anon_key.clone(),
            metrics,
        })
    }

    /// Metrics handle used for backend latency and failures.
    #[must_use]
    pub const fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub(crate) fn rest_url(&self, operation: &'static str, relation: &str) -> Result<Url> {
        self.endpoint(operation, &format!("rest/v1/{relation}"))
    }

    pub(crate) fn auth_url(&self, operation: &'static str, path: &str) -> Result<Url> {
        self.endpoint(operation, &format!("auth/v1/{path}"))
    }

    fn endpoint(&self, operation: &'static str, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|source| DataError::InvalidUrl { operation, source })
    }

    /// Attach the bearer token; anonymous calls use the public key.
    pub(crate) fn authorize(&self, request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
        let token = token.unwrap_or(&self.anon_key);
        request.header(AUTHORIZATION, format!("Bearer {token}"))
    }

    /// Send a request and return the response whatever its status.
    pub(crate) async fn send_raw(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<Response> {
        let started = Instant::now();
        let outcome = request.send().await;
        self.metrics.observe_backend_latency(started.elapsed());
        outcome.map_err(|source| self.fail(DataError::Transport { operation, source }))
    }

    /// Send a request and require a 2xx status.
    pub(crate) async fn send(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<Response> {
        let response = self.send_raw(operation, request).await?;
        if response.status().is_success() {
            return Ok(response);
        }
        Err(self.status_error(operation, response).await)
    }

    /// Send a request and decode a JSON body.
    pub(crate) async fn fetch_json<T>(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let response = self.send(operation, request).await?;
        self.decode(operation, response).await
    }

    pub(crate) async fn decode<T>(&self, operation: &'static str, response: Response) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let bytes = response
            .bytes()
            .await
            .map_err(|source| self.fail(DataError::Transport { operation, source }))?;
        serde_json::from_slice(&bytes)
            .map_err(|source| self.fail(DataError::Decode { operation, source }))
    }

    pub(crate) async fn status_error(&self, operation: &'static str, response: Response) -> DataError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let body = body.chars().take(BODY_EXCERPT_LEN).collect::<String>();
        self.fail(DataError::Status {
            operation,
            status,
            body,
        })
    }

    pub(crate) fn fail(&self, err: DataError) -> DataError {
        self.metrics.inc_backend_failure(err.operation());
        let request = current_request();
        let request_id = request.as_ref().map(|ctx| &*ctx.request_id);
        let route = request.as_ref().map(|ctx| &*ctx.route);
        if matches!(err, DataError::Status { status, .. } if status < 500) {
            debug!(
                operation = err.operation(),
                request_id,
                route,
                error = %err,
                "backend rejected request"
            );
        } else {
            warn!(
                operation = err.operation(),
                request_id,
                route,
                error = %err,
                "backend request failed"
            );
        }
        err
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

#[cfg(test)]
pub(crate) fn test_client(base: &str) -> SupabaseClient {
    let config = BackendConfig {
        url: Url::parse(base).expect("mock server url"),
        anon_key: "anon-key".to_string(),
        timeout: std::time::Duration::from_secs(5),
    };
    SupabaseClient::new(&config, Metrics::new().expect("metrics")).expect("client")
}
