//! Prometheus-backed metrics registry and snapshot helpers.
//!
//! # Design
//! - Encapsulates collector registration to keep the public API small.
//! - Labelled counters feed the exposition endpoint; unlabelled totals feed
//!   the health snapshot.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use prometheus::core::Collector;
use prometheus::{Encoder, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};
use serde::Serialize;

use crate::error::{Result, TelemetryError};

/// Prometheus-backed metrics registry shared across services.
#[derive(Clone)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

struct MetricsInner {
    registry: Registry,
    http_requests_total: IntCounterVec,
    page_renders_total: IntCounterVec,
    locale_switches_total: IntCounterVec,
    locale_anomalies_total: IntCounterVec,
    backend_failures_total: IntCounterVec,
    backend_latency_ms: IntGauge,
    totals: Totals,
}

#[derive(Default)]
struct Totals {
    http_requests: AtomicU64,
    page_renders: AtomicU64,
    locale_switches: AtomicU64,
    locale_anomalies: AtomicU64,
    backend_failures: AtomicU64,
}

/// Snapshot of selected counters for health reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    /// HTTP requests served.
    pub http_requests_total: u64,
    /// Pages rendered across all locales.
    pub page_renders_total: u64,
    /// Locale switches committed.
    pub locale_switches_total: u64,
    /// Locale anomalies observed (unsupported values, unavailable cookie stores).
    pub locale_anomalies_total: u64,
    /// Failed backend calls.
    pub backend_failures_total: u64,
    /// Latency of the most recent backend call (ms).
    pub backend_latency_ms: i64,
}

impl Metrics {
    /// Construct a new metrics registry with the standard collectors registered.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the Prometheus collectors cannot be
    /// built or registered.
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let http_requests_total = counter_vec(
            "http_requests_total",
            "Total HTTP requests received",
            &["route", "code"],
        )?;
        let page_renders_total = counter_vec(
            "page_renders_total",
            "Pages rendered by page and locale",
            &["page", "locale"],
        )?;
        let locale_switches_total = counter_vec(
            "locale_switches_total",
            "Locale switches committed by target locale",
            &["locale"],
        )?;
        let locale_anomalies_total = counter_vec(
            "locale_anomalies_total",
            "Ignored locale inputs and unavailable cookie stores by kind",
            &["kind"],
        )?;
        let backend_failures_total = counter_vec(
            "backend_failures_total",
            "Failed backend calls by operation",
            &["operation"],
        )?;
        let backend_latency_ms = IntGauge::with_opts(Opts::new(
            "backend_latency_ms",
            "Latency of the most recent backend call (ms)",
        ))
        .map_err(|source| TelemetryError::MetricsCollector {
            name: "backend_latency_ms",
            source,
        })?;

        register(&registry, "http_requests_total", &http_requests_total)?;
        register(&registry, "page_renders_total", &page_renders_total)?;
        register(&registry, "locale_switches_total", &locale_switches_total)?;
        register(&registry, "locale_anomalies_total", &locale_anomalies_total)?;
        register(&registry, "backend_failures_total", &backend_failures_total)?;
        register(&registry, "backend_latency_ms", &backend_latency_ms)?;

        Ok(Self {
            inner: Arc::new(MetricsInner {
                registry,
                http_requests_total,
                page_renders_total,
                locale_switches_total,
                locale_anomalies_total,
                backend_failures_total,
                backend_latency_ms,
                totals: Totals::default(),
            }),
        })
    }

    /// Increment the HTTP request counter for the given route and status code.
    pub fn inc_http_request(&self, route: &str, status: u16) {
        self.inner
            .http_requests_total
            .with_label_values(&[route, &status.to_string()])
            .inc();
        self.inner.totals.http_requests.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a rendered page payload.
    pub fn inc_page_render(&self, page: &str, locale: &str) {
        self.inner
            .page_renders_total
            .with_label_values(&[page, locale])
            .inc();
        self.inner.totals.page_renders.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a committed locale switch.
    pub fn inc_locale_switch(&self, locale: &str) {
        self.inner
            .locale_switches_total
            .with_label_values(&[locale])
            .inc();
        self.inner.totals.locale_switches.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a locale anomaly such as an unsupported switch target.
    pub fn inc_locale_anomaly(&self, kind: &str) {
        self.inner
            .locale_anomalies_total
            .with_label_values(&[kind])
            .inc();
        self.inner.totals.locale_anomalies.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a failed backend call.
    pub fn inc_backend_failure(&self, operation: &str) {
        self.inner
            .backend_failures_total
            .with_label_values(&[operation])
            .inc();
        self.inner.totals.backend_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Record the latency of a backend call.
    pub fn observe_backend_latency(&self, duration: Duration) {
        self.inner
            .backend_latency_ms
            .set(Self::duration_to_ms(duration));
    }

    /// Render the metrics registry using the Prometheus text exposition format.
    ///
    /// # Errors
    ///
    /// Returns an error if the metrics cannot be encoded or if the encoded
    /// buffer is not valid UTF-8.
    pub fn render(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.inner.registry.gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .map_err(|source| TelemetryError::MetricsEncode { source })?;
        String::from_utf8(buffer).map_err(|source| TelemetryError::MetricsUtf8 { source })
    }

    /// Take a point-in-time snapshot of the headline counters.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        let totals = &self.inner.totals;
        MetricsSnapshot {
            http_requests_total: totals.http_requests.load(Ordering::Relaxed),
            page_renders_total: totals.page_renders.load(Ordering::Relaxed),
            locale_switches_total: totals.locale_switches.load(Ordering::Relaxed),
            locale_anomalies_total: totals.locale_anomalies.load(Ordering::Relaxed),
            backend_failures_total: totals.backend_failures.load(Ordering::Relaxed),
            backend_latency_ms: self.inner.backend_latency_ms.get(),
        }
    }

    /// Convert a duration to milliseconds saturating at `i64::MAX`.
    pub(crate) fn duration_to_ms(duration: Duration) -> i64 {
        i64::try_from(duration.as_millis()).unwrap_or(i64::MAX)
    }
}

fn counter_vec(name: &'static str, help: &str, labels: &[&str]) -> Result<IntCounterVec> {
    IntCounterVec::new(Opts::new(name, help), labels)
        .map_err(|source| TelemetryError::MetricsCollector { name, source })
}

fn register<C>(registry: &Registry, name: &'static str, collector: &C) -> Result<()>
where
    C: Collector + Clone + 'static,
{
    registry
        .register(Box::new(collector.clone()))
        .map_err(|source| TelemetryError::MetricsRegister { name, source })
}
