//! Account handlers: password and emailed-link sign-in, sign-up, sign-out, profile, favorites.

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use recipio_i18n::reload_target;
use recipio_recipes::{
    Credentials, PasswordIssue, RecipeError, Registration, Session, SignUpOutcome, display_name,
    localize_favorite, validate_password,
};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::http::constants::LOGIN_PATH;
use crate::http::errors::ApiError;
use crate::http::locale::{current_locale, reload_response};
use crate::http::pages::parse_recipe_id;
use crate::http::session::{append_cookie, clear_session_cookie, session_cookie, session_token};
use crate::models::{
    AuthCallbackQuery, ProblemInvalidParam, ProfilePage, SessionResponse, SignUpRequest,
    SignUpResponse,
};
use crate::state::ApiState;

fn signed_in<T>(state: &ApiState, status: StatusCode, session: &Session, body: T) -> Response
where
    T: Serialize,
{
    let mut response = (status, Json(body)).into_response();
    append_cookie(
        &mut response,
        &session_cookie(&state.base_path, &session.access_token),
    );
    response
}

fn invalid_field(state: &ApiState, pointer: &str, message_key: &str) -> ApiError {
    let message = state.text(current_locale(), message_key);
    ApiError::bad_request()
        .with_detail(message.clone())
        .with_invalid_params(vec![ProblemInvalidParam {
            pointer: pointer.to_string(),
            message,
        }])
}

/// `POST /auth/login`.
pub(crate) async fn login(
    State(state): State<Arc<ApiState>>,
    Json(credentials): Json<Credentials>,
) -> Result<Response, ApiError> {
    if credentials.email.trim().is_empty() {
        return Err(invalid_field(&state, "/email", "Auth.invalidCredentials"));
    }
    if credentials.password.is_empty() {
        return Err(invalid_field(&state, "/password", "Auth.invalidCredentials"));
    }
    let session = state.accounts.sign_in(&credentials).await?;
    info!(user_id = %session.user.id, "login succeeded");
    let body = SessionResponse {
        display_name: display_name(&session.user),
        user: session.user.clone(),
    };
    Ok(signed_in(&state, StatusCode::OK, &session, body))
}

/// `POST /auth/signup`.
pub(crate) async fn signup(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<SignUpRequest>,
) -> Result<Response, ApiError> {
    if request.email.trim().is_empty() {
        return Err(invalid_field(&state, "/email", "Auth.signUpError"));
    }
    if let Err(issue) = validate_password(&request.password, &request.confirm_password) {
        let pointer = match issue {
            PasswordIssue::TooShort => "/password",
            PasswordIssue::Mismatch => "/confirm_password",
        };
        return Err(invalid_field(&state, pointer, issue.message_key()));
    }
    let registration = Registration {
        email: request.email.trim().to_string(),
        password: request.password,
        display_name: request.display_name,
    };
    match state.accounts.sign_up(&registration).await? {
        SignUpOutcome::SignedIn(session) => {
            info!(user_id = %session.user.id, "account created");
            let body = SignUpResponse::SignedIn {
                display_name: display_name(&session.user),
                user: session.user.clone(),
            };
            Ok(signed_in(&state, StatusCode::CREATED, &session, body))
        }
        SignUpOutcome::ConfirmationRequired => {
            info!("account created; awaiting email confirmation");
            let body = SignUpResponse::ConfirmationRequired {
                message: state.text(current_locale(), "Auth.emailConfirmationRequired"),
            };
            Ok((StatusCode::ACCEPTED, Json(body)).into_response())
        }
    }
}

/// `GET /auth/callback?code=<code>&next=<path>`.
///
/// Trades the code from an emailed sign-in link for a session cookie and
/// reloads `next`. A missing or rejected code sends the browser to the login
/// page, with the backend's reason in `error` when there is one.
pub(crate) async fn auth_callback(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<AuthCallbackQuery>,
) -> Response {
    let code = query
        .code
        .as_deref()
        .map(str::trim)
        .filter(|code| !code.is_empty());
    let Some(code) = code else {
        debug!("auth callback without a code");
        return reload_response(&state, &reload_target(&state.base_path, LOGIN_PATH), None);
    };
    match state.accounts.exchange_code(code).await {
        Ok(session) => {
            info!(user_id = %session.user.id, "signed in from emailed link");
            let target = reload_target(&state.base_path, query.next.as_deref().unwrap_or("/"));
            let cookie = session_cookie(&state.base_path, &session.access_token);
            reload_response(&state, &target, Some(&cookie))
        }
        Err(err) => {
            warn!(error = %err, operation = err.operation(), "auth code exchange failed");
            let reason = match err {
                RecipeError::AuthCodeRejected { reason } => reason,
                other => other.to_string(),
            };
            let login = format!("{LOGIN_PATH}?error={}", urlencoding::encode(&reason));
            reload_response(&state, &reload_target(&state.base_path, &login), None)
        }
    }
}

/// `POST /auth/logout`. The cookie is cleared even when revocation fails.
pub(crate) async fn logout(State(state): State<Arc<ApiState>>, headers: HeaderMap) -> Response {
    if let Some(token) = session_token(&headers)
        && let Err(err) = state.accounts.sign_out(&token).await
    {
        warn!(error = %err, "session revocation failed");
    }
    let mut response = StatusCode::NO_CONTENT.into_response();
    append_cookie(&mut response, &clear_session_cookie(&state.base_path));
    response
}

/// `GET /profile`.
pub(crate) async fn profile(
    State(state): State<Arc<ApiState>>,
    Extension(session): Extension<Session>,
) -> Result<Json<ProfilePage>, ApiError> {
    let locale = current_locale();
    let favorites: Vec<_> = state
        .accounts
        .favorites(&session)
        .await?
        .iter()
        .map(|favorite| localize_favorite(favorite, locale))
        .collect();
    state.page_rendered("profile", locale);
    Ok(Json(ProfilePage {
        context: locale.into(),
        display_name: display_name(&session.user)
            .unwrap_or_else(|| state.text(locale, "Profile.displayName")),
        email: session.user.email.clone(),
        empty_message: favorites
            .is_empty()
            .then(|| state.text(locale, "Profile.noFavorites")),
        favorites,
    }))
}

/// `POST /favorites/{id}`.
pub(crate) async fn add_favorite(
    State(state): State<Arc<ApiState>>,
    Extension(session): Extension<Session>,
    Path(recipe_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let recipe_id = parse_recipe_id(&recipe_id)?;
    state.accounts.add_favorite(&session, recipe_id).await?;
    info!(recipe_id, user_id = %session.user.id, "favorite added");
    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /favorites/{id}`.
pub(crate) async fn remove_favorite(
    State(state): State<Arc<ApiState>>,
    Extension(session): Extension<Session>,
    Path(recipe_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let recipe_id = parse_recipe_id(&recipe_id)?;
    state.accounts.remove_favorite(&session, recipe_id).await?;
    info!(recipe_id, user_id = %session.user.id, "favorite removed");
    Ok(StatusCode::NO_CONTENT)
}
