//! Session cookie handling and the guard for signed-in routes.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, HeaderValue, Request, header::SET_COOKIE},
    middleware::Next,
    response::Response,
};
use recipio_config::BasePath;
use recipio_recipes::Session;
use tracing::debug;

use crate::http::constants::SESSION_COOKIE;
use crate::http::errors::ApiError;
use crate::http::locale::request_cookies;
use crate::state::ApiState;

/// Access token carried by the request's session cookie.
pub(crate) fn session_token(headers: &HeaderMap) -> Option<String> {
    request_cookies(headers)
        .get(SESSION_COOKIE)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(ToString::to_string)
}

/// `Set-Cookie` value storing `token` for the browser session.
pub(crate) fn session_cookie(base: &BasePath, token: &str) -> String {
    format!(
        "{SESSION_COOKIE}={}; Path={}; HttpOnly; SameSite=Lax",
        urlencoding::encode(token),
        base.cookie_path()
    )
}

/// `Set-Cookie` value removing the session cookie.
pub(crate) fn clear_session_cookie(base: &BasePath) -> String {
    format!(
        "{SESSION_COOKIE}=; Path={}; Max-Age=0; HttpOnly; SameSite=Lax",
        base.cookie_path()
    )
}

pub(crate) fn append_cookie(response: &mut Response, cookie: &str) {
    if let Ok(value) = HeaderValue::from_str(cookie) {
        response.headers_mut().append(SET_COOKIE, value);
    }
}

/// Reject requests without a live session; on success the [`Session`] is
/// available to handlers as an extension.
pub(crate) async fn require_session(
    State(state): State<Arc<ApiState>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let token = session_token(req.headers()).ok_or_else(ApiError::unauthorized)?;
    let Some(user) = state.accounts.session(&token).await? else {
        debug!("session cookie no longer valid");
        return Err(ApiError::unauthorized());
    };
    req.extensions_mut().insert(Session {
        access_token: token,
        user,
    });
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::COOKIE;

    #[test]
    fn token_is_read_from_the_session_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("NEXT_LOCALE=tr; RECIPIO_SESSION=abc.def"),
        );
        assert_eq!(session_token(&headers).as_deref(), Some("abc.def"));

        headers.insert(COOKIE, HeaderValue::from_static("RECIPIO_SESSION="));
        assert_eq!(session_token(&headers), None);
    }

    #[test]
    fn cookies_are_scoped_to_the_base_path() -> Result<(), recipio_config::ConfigError> {
        let base = BasePath::parse("/site")?;
        assert_eq!(
            session_cookie(&base, "tok"),
            "RECIPIO_SESSION=tok; Path=/site; HttpOnly; SameSite=Lax"
        );
        assert_eq!(
            clear_session_cookie(&BasePath::root()),
            "RECIPIO_SESSION=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax"
        );
        Ok(())
    }
}
