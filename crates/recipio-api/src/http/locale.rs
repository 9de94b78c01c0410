//! # Design
//!
//! - Resolve the active locale once per request from the `NEXT_LOCALE` cookie,
//!   before any handler runs, and keep it in task-local storage.
//! - Unsupported or missing cookie values fall back to the default locale.
//! - Switching writes the cookie and answers with a full-reload redirect; an
//!   unsupported target is an anomaly that is logged and counted, never surfaced.

use std::future::Future;
use std::sync::Arc;

use axum::{
    Json,
    body::Body,
    extract::{Query, State},
    http::{
        HeaderMap, HeaderValue, Request, StatusCode,
        header::{COOKIE, LOCATION, SET_COOKIE},
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use recipio_i18n::{
    Catalogs, CookieJar, DEFAULT_LOCALE, LOCALE_COOKIE, Locale, LocaleCookie, LocaleSwitch,
    plan_locale_switch, reload_target, resolve_server_locale,
};
use recipio_telemetry::set_request_context;
use tracing::{Span, debug, info, warn};

use crate::http::constants::HEADER_REQUEST_ID;
use crate::models::{LocaleSwitchQuery, MessagesResponse};
use crate::state::ApiState;

#[derive(Clone, Copy)]
struct RequestLanguage {
    locale: Locale,
    catalogs: &'static Catalogs,
}

tokio::task_local! {
    static REQUEST_LANGUAGE: RequestLanguage;
}

/// Locale resolved for the current request; the default outside a request.
pub(crate) fn current_locale() -> Locale {
    REQUEST_LANGUAGE
        .try_with(|language| language.locale)
        .unwrap_or(DEFAULT_LOCALE)
}

/// Catalog text for `key` in the request's locale, from the catalogs the
/// request is served with.
pub(crate) fn request_text(key: &str) -> String {
    REQUEST_LANGUAGE
        .try_with(|language| language.catalogs.text(language.locale, key))
        .unwrap_or_else(|_| Catalogs::embedded().text(DEFAULT_LOCALE, key))
}

/// Run `fut` with `locale` and `catalogs` as the request language.
pub(crate) async fn with_request_language<F>(
    locale: Locale,
    catalogs: &'static Catalogs,
    fut: F,
) -> F::Output
where
    F: Future,
{
    REQUEST_LANGUAGE
        .scope(RequestLanguage { locale, catalogs }, fut)
        .await
}

#[cfg(test)]
pub(crate) async fn with_request_locale<F>(locale: Locale, fut: F) -> F::Output
where
    F: Future,
{
    with_request_language(locale, Catalogs::embedded(), fut).await
}

/// Cookie jar of a request; repeated `Cookie` headers are merged.
pub(crate) fn request_cookies(headers: &HeaderMap) -> CookieJar {
    let joined = headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .collect::<Vec<_>>()
        .join("; ");
    CookieJar::parse(&joined)
}

pub(crate) fn request_locale(headers: &HeaderMap) -> Locale {
    resolve_server_locale(&request_cookies(headers))
}

/// Middleware resolving the request locale ahead of every handler.
pub(crate) async fn with_locale(
    State(state): State<Arc<ApiState>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let cookies = request_cookies(req.headers());
    let locale = resolve_server_locale(&cookies);
    if cookies
        .get(LOCALE_COOKIE)
        .is_some_and(|raw| Locale::parse(raw).is_none())
    {
        state.telemetry.inc_locale_anomaly("unsupported_cookie");
    }
    let request_id = req
        .headers()
        .get(HEADER_REQUEST_ID)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    set_request_context(&Span::current(), request_id, locale.code());
    with_request_language(locale, state.catalogs, next.run(req)).await
}

/// `GET /locale-switching?locale=<code>&next=<path>`.
pub(crate) async fn switch_locale(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<LocaleSwitchQuery>,
) -> Response {
    let active = current_locale();
    let target = reload_target(&state.base_path, query.next.as_deref().unwrap_or("/"));
    let requested = query.locale.as_deref().unwrap_or_default();
    let cookie = match plan_locale_switch(active, requested) {
        LocaleSwitch::Switch(locale) => {
            state.telemetry.inc_locale_switch(locale.code());
            info!(from = %active, to = %locale, "locale switched");
            Some(LocaleCookie::new(&state.base_path).header_value(locale))
        }
        LocaleSwitch::Unchanged(locale) | LocaleSwitch::Pending { to: locale } => {
            debug!(locale = %locale, "locale switch skipped");
            None
        }
        LocaleSwitch::Ignored { requested } => {
            state.telemetry.inc_locale_anomaly("unsupported_locale");
            warn!(requested = %requested, "ignoring unsupported locale switch");
            None
        }
    };
    reload_response(&state, &target, cookie.as_deref())
}

pub(crate) fn reload_response(state: &ApiState, target: &str, cookie: Option<&str>) -> Response {
    let location = HeaderValue::from_str(target).unwrap_or_else(|_| {
        warn!("reload target is not a valid header value; using site root");
        HeaderValue::from_str(&state.base_path.join("/"))
            .unwrap_or_else(|_| HeaderValue::from_static("/"))
    });
    let mut response = (StatusCode::SEE_OTHER, [(LOCATION, location)]).into_response();
    if let Some(cookie) = cookie.and_then(|cookie| HeaderValue::from_str(cookie).ok()) {
        response.headers_mut().insert(SET_COOKIE, cookie);
    }
    response
}

/// `GET /i18n/messages`.
pub(crate) async fn messages(State(state): State<Arc<ApiState>>) -> Json<MessagesResponse> {
    let locale = current_locale();
    Json(MessagesResponse {
        context: locale.into(),
        messages: state.catalogs.resolved(locale),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_state::{fixture, fixture_with_base};
    use recipio_config::BasePath;

    fn headers(cookie: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(cookie).expect("cookie header"));
        headers
    }

    fn header<'a>(response: &'a Response, name: &axum::http::HeaderName) -> Option<&'a str> {
        response
            .headers()
            .get(name)
            .and_then(|value| value.to_str().ok())
    }

    #[test]
    fn request_locale_reads_the_cookie() {
        assert_eq!(request_locale(&headers("theme=dark; NEXT_LOCALE=en")), Locale::En);
        assert_eq!(request_locale(&headers("NEXT_LOCALE=de")), Locale::Tr);
        assert_eq!(request_locale(&HeaderMap::new()), Locale::Tr);
    }

    #[test]
    fn repeated_cookie_headers_are_merged() {
        let mut headers = headers("theme=dark");
        headers.append(COOKIE, HeaderValue::from_static("NEXT_LOCALE=en"));
        assert_eq!(request_locale(&headers), Locale::En);
    }

    #[tokio::test]
    async fn current_locale_defaults_outside_a_request() {
        assert_eq!(current_locale(), Locale::Tr);
        let scoped = with_request_locale(Locale::En, async { current_locale() }).await;
        assert_eq!(scoped, Locale::En);
    }

    #[tokio::test]
    async fn switching_sets_the_cookie_and_reloads() {
        let fixture = fixture();
        let response = switch_locale(
            State(fixture.state.clone()),
            Query(LocaleSwitchQuery {
                locale: Some("en".to_string()),
                next: Some("/recipes".to_string()),
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(header(&response, &LOCATION), Some("/recipes"));
        let cookie = header(&response, &SET_COOKIE).unwrap_or_default().to_string();
        assert_eq!(
            cookie,
            "NEXT_LOCALE=en; Path=/; Max-Age=31536000; SameSite=Lax"
        );
        assert_eq!(fixture.state.telemetry.snapshot().locale_switches_total, 1);

        let cookie_value = cookie.split(';').next().unwrap_or_default();
        assert_eq!(request_locale(&headers(cookie_value)), Locale::En);
    }

    #[tokio::test]
    async fn switching_to_the_active_locale_is_a_no_op() {
        let fixture = fixture();
        let response = with_request_locale(
            Locale::En,
            switch_locale(
                State(fixture.state.clone()),
                Query(LocaleSwitchQuery {
                    locale: Some("en".to_string()),
                    next: Some("/".to_string()),
                }),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert!(response.headers().get(SET_COOKIE).is_none());
        assert_eq!(fixture.state.telemetry.snapshot().locale_switches_total, 0);
    }

    #[tokio::test]
    async fn unsupported_locales_are_counted_not_applied() {
        let fixture = fixture();
        let response = switch_locale(
            State(fixture.state.clone()),
            Query(LocaleSwitchQuery {
                locale: Some("fr".to_string()),
                next: Some("/categories".to_string()),
            }),
        )
        .await;
        assert_eq!(header(&response, &LOCATION), Some("/categories"));
        assert!(response.headers().get(SET_COOKIE).is_none());
        let snapshot = fixture.state.telemetry.snapshot();
        assert_eq!(snapshot.locale_anomalies_total, 1);
        assert_eq!(snapshot.locale_switches_total, 0);
    }

    #[tokio::test]
    async fn reload_targets_stay_on_site_and_under_the_base_path() {
        let fixture = fixture_with_base(BasePath::parse("/tarifler").expect("base path"));
        let response = switch_locale(
            State(fixture.state.clone()),
            Query(LocaleSwitchQuery {
                locale: Some("en".to_string()),
                next: Some("//evil.example.com".to_string()),
            }),
        )
        .await;
        assert_eq!(header(&response, &LOCATION), Some("/tarifler/"));
        assert_eq!(
            header(&response, &SET_COOKIE),
            Some("NEXT_LOCALE=en; Path=/tarifler; Max-Age=31536000; SameSite=Lax")
        );
    }

    #[tokio::test]
    async fn decoded_targets_reload_the_same_page() {
        let fixture = fixture();
        for (next, expected) in [
            ("/recipes?search=lentil soup", "/recipes?search=lentil%20soup"),
            ("/categories/çorbalar", "/categories/%C3%A7orbalar"),
        ] {
            let response = switch_locale(
                State(fixture.state.clone()),
                Query(LocaleSwitchQuery {
                    locale: Some("en".to_string()),
                    next: Some(next.to_string()),
                }),
            )
            .await;
            assert_eq!(header(&response, &LOCATION), Some(expected), "{next}");
            assert!(response.headers().get(SET_COOKIE).is_some());
        }
    }

    #[tokio::test]
    async fn messages_follow_the_request_locale() {
        let fixture = fixture();
        let Json(english) =
            with_request_locale(Locale::En, messages(State(fixture.state.clone()))).await;
        assert_eq!(english.context.lang, "en");
        assert_eq!(
            english.messages.get("HomePage.featuredRecipes").map(String::as_str),
            Some("Featured Recipes")
        );

        let Json(turkish) = messages(State(fixture.state)).await;
        assert_eq!(turkish.context.locale, Locale::Tr);
        assert_eq!(turkish.messages.len(), english.messages.len());
    }
}
