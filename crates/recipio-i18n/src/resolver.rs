//! Locale resolution for server rendering and client mount.
//!
//! Both paths are total: any failure to read a preference resolves to
//! [`DEFAULT_LOCALE`](crate::locale::DEFAULT_LOCALE).

use tracing::debug;

use crate::cookie::LOCALE_COOKIE;
use crate::locale::{DEFAULT_LOCALE, Locale};
use crate::store::{CookieSource, LocaleStore};

/// Locale for a server render, read from the request cookies.
///
/// Never fails: an unreachable cookie store, a missing cookie, or an
/// unsupported value all yield the default locale.
#[must_use]
pub fn resolve_server_locale<C>(cookies: &C) -> Locale
where
    C: CookieSource + ?Sized,
{
    match cookies.cookie(LOCALE_COOKIE) {
        Ok(Some(raw)) => Locale::parse(&raw).unwrap_or_else(|| {
            debug!(value = %raw, "ignoring unsupported locale cookie");
            DEFAULT_LOCALE
        }),
        Ok(None) => DEFAULT_LOCALE,
        Err(err) => {
            debug!(error = %err, "cookie store unavailable; using default locale");
            DEFAULT_LOCALE
        }
    }
}

/// Locale the client adopts on mount, read from its persisted store.
#[must_use]
pub fn resolve_client_locale<S>(store: &S) -> Locale
where
    S: LocaleStore + ?Sized,
{
    store.read()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cookie::CookieJar;
    use crate::store::{MemoryLocaleStore, NoRequestCookies};

    #[test]
    fn server_locale_reads_supported_cookie() {
        assert_eq!(
            resolve_server_locale(&CookieJar::parse("NEXT_LOCALE=en")),
            Locale::En
        );
        assert_eq!(
            resolve_server_locale(&CookieJar::parse("NEXT_LOCALE=tr")),
            Locale::Tr
        );
    }

    #[test]
    fn server_locale_defaults_for_anything_else() {
        for header in ["", "other=en", "NEXT_LOCALE=de", "NEXT_LOCALE=", "NEXT_LOCALE=EN"] {
            assert_eq!(
                resolve_server_locale(&CookieJar::parse(header)),
                DEFAULT_LOCALE,
                "{header:?}"
            );
        }
        assert_eq!(resolve_server_locale(&NoRequestCookies), DEFAULT_LOCALE);
    }

    #[test]
    fn server_and_client_agree_on_same_cookie() {
        for raw in ["en", "tr", "xx"] {
            let jar = CookieJar::parse(&format!("NEXT_LOCALE={raw}"));
            let store = MemoryLocaleStore::with_value(raw);
            assert_eq!(resolve_server_locale(&jar), resolve_client_locale(&store));
        }
    }
}
