//! Router construction and server host.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    http::{Method, Request, header::CONTENT_TYPE},
    middleware,
    routing::{get, post},
};
use recipio_config::BasePath;
use recipio_recipes::{AccountSource, RecipeSource};
use recipio_telemetry::{Metrics, build_sha};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{Span, info};

use crate::error::{ApiServerError, ApiServerResult};
use crate::http::account::{
    add_favorite, auth_callback, login, logout, profile, remove_favorite, signup,
};
use crate::http::constants::HEADER_REQUEST_ID;
use crate::http::health::{health, metrics};
use crate::http::locale::{messages, switch_locale, with_locale};
use crate::http::pages::{
    category_detail, home, legal_page, list_categories, list_recipes, recipe_detail,
};
use crate::http::session::require_session;
use crate::http::telemetry::HttpMetricsLayer;
use crate::state::ApiState;

/// Axum router wrapper that hosts the Recipio site.
pub struct ApiServer {
    router: Router,
}

impl ApiServer {
    /// Wire the backends, metrics, and base path into a ready router.
    pub fn new(
        recipes: Arc<dyn RecipeSource>,
        accounts: Arc<dyn AccountSource>,
        telemetry: Metrics,
        base_path: BasePath,
    ) -> Self {
        let state = Arc::new(ApiState::new(
            recipes,
            accounts,
            telemetry.clone(),
            base_path,
        ));
        let cors_layer = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
            .allow_headers([CONTENT_TYPE]);
        let trace_layer = TraceLayer::new_for_http()
            .make_span_with(|request: &Request<_>| {
                let method = request.method().clone();
                let uri_path = request.uri().path();
                let request_id = request
                    .headers()
                    .get(HEADER_REQUEST_ID)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("")
                    .to_string();

                tracing::info_span!(
                    "http.request",
                    method = %method,
                    route = %uri_path,
                    request_id = %request_id,
                    locale = tracing::field::Empty,
                    build_sha = %build_sha(),
                    status_code = tracing::field::Empty,
                    latency_ms = tracing::field::Empty
                )
            })
            .on_request(|_request: &Request<_>, _span: &Span| {})
            .on_response(
                |response: &axum::response::Response, latency: Duration, span: &Span| {
                    span.record("status_code", response.status().as_u16());
                    let latency_ms = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
                    span.record("latency_ms", latency_ms);
                },
            );
        let layered = ServiceBuilder::new()
            .layer(recipio_telemetry::propagate_request_id_layer())
            .layer(recipio_telemetry::set_request_id_layer())
            .layer(trace_layer)
            .layer(HttpMetricsLayer::new(telemetry))
            .layer(middleware::from_fn_with_state(state.clone(), with_locale));

        let router = Self::public_routes()
            .merge(Self::account_routes(&state))
            .layer(cors_layer)
            .route_layer(layered)
            .with_state(state);

        Self { router }
    }

    fn public_routes() -> Router<Arc<ApiState>> {
        Router::new()
            .route("/", get(home))
            .route("/recipes", get(list_recipes))
            .route("/recipes/{id}", get(recipe_detail))
            .route("/categories", get(list_categories))
            .route("/categories/{slug}", get(category_detail))
            .route("/legal/{page}", get(legal_page))
            .route("/locale-switching", get(switch_locale))
            .route("/i18n/messages", get(messages))
            .route("/auth/login", post(login))
            .route("/auth/signup", post(signup))
            .route("/auth/logout", post(logout))
            .route("/auth/callback", get(auth_callback))
            .route("/health", get(health))
            .route("/metrics", get(metrics))
    }

    fn account_routes(state: &Arc<ApiState>) -> Router<Arc<ApiState>> {
        let require_user = middleware::from_fn_with_state(state.clone(), require_session);

        Router::new()
            .route("/profile", get(profile).route_layer(require_user.clone()))
            .route(
                "/favorites/{id}",
                post(add_favorite)
                    .delete(remove_favorite)
                    .route_layer(require_user),
            )
    }

    /// Serve until `shutdown` resolves, then drain in-flight requests.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener fails to bind or the server terminates unexpectedly.
    pub async fn serve<F>(self, addr: SocketAddr, shutdown: F) -> ApiServerResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        info!(addr = %addr, "starting http server");
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ApiServerError::Bind { addr, source })?;
        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|source| ApiServerError::Serve { source })
    }
}
