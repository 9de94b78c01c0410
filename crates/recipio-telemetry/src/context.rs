//! Context propagation helpers for request and application spans.
//!
//! # Design
//! - The HTTP metrics layer scopes each request's id and route in a task local;
//!   error paths deeper in the stack read it back to tag their logs.
//! - An application-level span carries the service name and build SHA.

use std::future::Future;
use std::sync::Arc;

use tracing::{Span, span::Entered};

use crate::init::build_sha;

/// Guard that keeps the application-level span entered for the lifetime of the process.
pub struct GlobalContextGuard {
    _guard: Entered<'static>,
}

impl GlobalContextGuard {
    /// Enter the application-level tracing span for the lifetime of the guard.
    #[must_use]
    pub fn new(service: impl Into<String>) -> Self {
        let service = service.into();
        let span: &'static Span = Box::leak(Box::new(
            tracing::info_span!("app", service = %service, build_sha = %build_sha()),
        ));
        let guard = span.enter();
        Self { _guard: guard }
    }
}

/// Record the active locale on a request span.
pub fn set_request_context(span: &Span, request_id: impl Into<String>, locale: &str) {
    let request_id = request_id.into();
    span.record("request_id", tracing::field::display(&request_id));
    span.record("locale", tracing::field::display(locale));
}

/// Identifiers of the HTTP request the current task is serving.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestContext {
    /// Value of the `x-request-id` header.
    pub request_id: Arc<str>,
    /// Matched route template, or `unmatched`.
    pub route: Arc<str>,
}

tokio::task_local! {
    static REQUEST: RequestContext;
}

/// Request the current task is serving; `None` outside a request scope.
#[must_use]
pub fn current_request() -> Option<RequestContext> {
    REQUEST.try_with(Clone::clone).ok()
}

/// Run `fut` with the request identifiers visible to [`current_request`].
pub async fn with_request_context<Fut, T>(
    request_id: impl Into<String>,
    route: impl Into<String>,
    fut: Fut,
) -> T
where
    Fut: Future<Output = T>,
{
    let context = RequestContext {
        request_id: Arc::from(request_id.into()),
        route: Arc::from(route.into()),
    };
    REQUEST.scope(context, fut).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_context_guard_can_be_entered() {
        let guard = GlobalContextGuard::new("recipio-test");
        drop(guard);
    }

    #[test]
    fn set_request_context_records_span_fields() {
        let span = tracing::info_span!(
            "request",
            request_id = tracing::field::Empty,
            locale = tracing::field::Empty
        );
        set_request_context(&span, "req-1", "tr");
    }

    #[tokio::test]
    async fn request_context_is_scoped_to_the_future() {
        let seen = with_request_context("req-42", "/recipes/{id}", async { current_request() }).await;
        let seen = seen.expect("request context");
        assert_eq!(&*seen.request_id, "req-42");
        assert_eq!(&*seen.route, "/recipes/{id}");
        assert!(current_request().is_none());
    }
}
