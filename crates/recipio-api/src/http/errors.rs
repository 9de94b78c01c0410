//! RFC9457-style API error wrapper.
//!
//! Details are resolved from the message catalog of the request's locale, so
//! a Turkish session sees Turkish problem descriptions.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use recipio_recipes::RecipeError;
use recipio_telemetry::current_request;
use tracing::error;

use crate::http::constants::{
    PROBLEM_BAD_REQUEST, PROBLEM_EMAIL_UNCONFIRMED, PROBLEM_INTERNAL,
    PROBLEM_INVALID_CREDENTIALS, PROBLEM_NOT_FOUND, PROBLEM_REGISTRATION_REJECTED,
    PROBLEM_SERVICE_UNAVAILABLE, PROBLEM_UNAUTHORIZED,
};
use crate::http::locale::request_text;
use crate::models::{ProblemDetails, ProblemInvalidParam};

/// Structured API error with optional RFC9457 fields.
#[derive(Debug)]
pub(crate) struct ApiError {
    pub(crate) status: StatusCode,
    pub(crate) kind: &'static str,
    title: &'static str,
    pub(crate) detail: Option<String>,
    pub(crate) invalid_params: Option<Vec<ProblemInvalidParam>>,
}

impl ApiError {
    const fn new(status: StatusCode, kind: &'static str, title: &'static str) -> Self {
        Self {
            status,
            kind,
            title,
            detail: None,
            invalid_params: None,
        }
    }

    pub(crate) fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Attach the catalog text for `key` in the request's locale.
    pub(crate) fn with_message(self, key: &str) -> Self {
        self.with_detail(request_text(key))
    }

    pub(crate) fn with_invalid_params(mut self, params: Vec<ProblemInvalidParam>) -> Self {
        self.invalid_params = Some(params);
        self
    }

    pub(crate) fn internal(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            PROBLEM_INTERNAL,
            "internal server error",
        )
        .with_detail(message)
    }

    pub(crate) fn unauthorized() -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            PROBLEM_UNAUTHORIZED,
            "authentication required",
        )
        .with_message("Auth.loginToAccount")
    }

    pub(crate) const fn bad_request() -> Self {
        Self::new(StatusCode::BAD_REQUEST, PROBLEM_BAD_REQUEST, "bad request")
    }

    pub(crate) fn not_found(message_key: &str) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            PROBLEM_NOT_FOUND,
            "resource not found",
        )
        .with_message(message_key)
    }

    pub(crate) fn service_unavailable() -> Self {
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            PROBLEM_SERVICE_UNAVAILABLE,
            "service unavailable",
        )
        .with_message("ErrorPage.description")
    }
}

impl From<RecipeError> for ApiError {
    fn from(err: RecipeError) -> Self {
        match err {
            RecipeError::InvalidCredentials => Self::new(
                StatusCode::UNAUTHORIZED,
                PROBLEM_INVALID_CREDENTIALS,
                "invalid credentials",
            )
            .with_message("Auth.invalidCredentials"),
            RecipeError::EmailConfirmationRequired => Self::new(
                StatusCode::FORBIDDEN,
                PROBLEM_EMAIL_UNCONFIRMED,
                "email confirmation required",
            )
            .with_message("Auth.emailConfirmationRequired"),
            RecipeError::RegistrationRejected { reason } => Self::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                PROBLEM_REGISTRATION_REJECTED,
                "registration rejected",
            )
            .with_detail(reason),
            RecipeError::AuthCodeRejected { reason } => Self::new(
                StatusCode::UNAUTHORIZED,
                PROBLEM_INVALID_CREDENTIALS,
                "auth code rejected",
            )
            .with_detail(reason),
            err @ RecipeError::Backend { .. } => {
                let request = current_request();
                error!(
                    operation = err.operation(),
                    request_id = request.as_ref().map(|ctx| &*ctx.request_id),
                    route = request.as_ref().map(|ctx| &*ctx.route),
                    error = %err,
                    "backend call failed"
                );
                Self::service_unavailable()
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ProblemDetails {
            kind: self.kind.to_string(),
            title: self.title.to_string(),
            status: self.status.as_u16(),
            detail: self.detail,
            invalid_params: self.invalid_params,
            request_id: current_request()
                .map(|ctx| ctx.request_id.to_string())
                .filter(|id| !id.is_empty()),
        };
        (self.status, Json(body)).into_response()
    }
}
