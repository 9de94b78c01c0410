//! Where locale preferences are read from and written to.
//!
//! # Design
//! - [`CookieSource`] is the server view: read-only access to request cookies.
//! - [`LocaleStore`] is the client view: the persisted preference the browser
//!   can both read and overwrite.
//! - Storage failures surface as [`I18nError`]; resolvers decide how to degrade.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::debug;

use crate::cookie::{CookieJar, LOCALE_COOKIE, LocaleCookie};
use crate::error::{I18nError, I18nResult};
use crate::locale::Locale;

/// Read access to the cookies of the current request.
pub trait CookieSource {
    /// Value of the named cookie.
    ///
    /// # Errors
    ///
    /// Returns [`I18nError::CookieStoreUnavailable`] when no cookie store can be reached.
    fn cookie(&self, name: &str) -> I18nResult<Option<String>>;
}

impl CookieSource for CookieJar {
    fn cookie(&self, name: &str) -> I18nResult<Option<String>> {
        Ok(self.get(name).map(ToString::to_string))
    }
}

/// Cookie source for rendering outside a request (prerendering, background work).
#[derive(Clone, Copy, Debug, Default)]
pub struct NoRequestCookies;

impl CookieSource for NoRequestCookies {
    fn cookie(&self, _name: &str) -> I18nResult<Option<String>> {
        Err(I18nError::CookieStoreUnavailable {
            reason: "no_request_scope",
        })
    }
}

/// Persisted locale preference on the client.
pub trait LocaleStore {
    /// Raw stored value, unvalidated.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying storage cannot be read.
    fn read_raw(&self) -> I18nResult<Option<String>>;

    /// Persist a locale preference.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying storage rejects the write.
    fn write(&self, locale: Locale) -> I18nResult<()>;

    /// Stored preference restricted to the supported set; unreadable or unknown
    /// values resolve to the default locale.
    fn read(&self) -> Locale {
        match self.read_raw() {
            Ok(raw) => Locale::resolve(raw.as_deref()),
            Err(err) => {
                debug!(error = %err, "locale store unreadable; using default locale");
                Locale::default()
            }
        }
    }
}

/// In-memory store, handy for tests and non-browser hosts.
#[derive(Debug, Default)]
pub struct MemoryLocaleStore {
    value: Mutex<Option<String>>,
    writes: AtomicUsize,
}

impl MemoryLocaleStore {
    /// Store pre-seeded with a raw value.
    #[must_use]
    pub fn with_value(raw: &str) -> Self {
        Self {
            value: Mutex::new(Some(raw.to_string())),
            writes: AtomicUsize::new(0),
        }
    }

    /// Number of successful writes so far.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl LocaleStore for MemoryLocaleStore {
    fn read_raw(&self) -> I18nResult<Option<String>> {
        self.value
            .lock()
            .map(|guard| guard.clone())
            .map_err(|_| I18nError::CookieStoreUnavailable { reason: "poisoned" })
    }

    fn write(&self, locale: Locale) -> I18nResult<()> {
        let mut guard = self
            .value
            .lock()
            .map_err(|_| I18nError::CookieStoreUnavailable { reason: "poisoned" })?;
        *guard = Some(locale.code().to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Store backed by a `document.cookie`-style string.
///
/// Writes record the full cookie assignment so hosts can replay it against the
/// real document.
#[derive(Debug)]
pub struct DocumentCookieStore {
    jar: Mutex<CookieJar>,
    cookie: LocaleCookie,
    assignments: Mutex<Vec<String>>,
}

impl DocumentCookieStore {
    /// Seed from the current `document.cookie` value.
    #[must_use]
    pub fn new(document_cookie: &str, cookie: LocaleCookie) -> Self {
        Self {
            jar: Mutex::new(CookieJar::parse(document_cookie)),
            cookie,
            assignments: Mutex::new(Vec::new()),
        }
    }

    /// Current cookie string as the document would expose it.
    ///
    /// # Errors
    ///
    /// Returns an error if the jar lock is poisoned.
    pub fn document_cookie(&self) -> I18nResult<String> {
        self.jar
            .lock()
            .map(|jar| jar.to_header_value())
            .map_err(|_| I18nError::CookieStoreUnavailable { reason: "poisoned" })
    }

    /// Cookie assignments performed so far, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned.
    pub fn assignments(&self) -> I18nResult<Vec<String>> {
        self.assignments
            .lock()
            .map(|list| list.clone())
            .map_err(|_| I18nError::CookieStoreUnavailable { reason: "poisoned" })
    }
}

impl LocaleStore for DocumentCookieStore {
    fn read_raw(&self) -> I18nResult<Option<String>> {
        self.jar
            .lock()
            .map(|jar| jar.get(LOCALE_COOKIE).map(ToString::to_string))
            .map_err(|_| I18nError::CookieStoreUnavailable { reason: "poisoned" })
    }

    fn write(&self, locale: Locale) -> I18nResult<()> {
        let assignment = self.cookie.header_value(locale);
        self.jar
            .lock()
            .map_err(|_| I18nError::CookieStoreUnavailable { reason: "poisoned" })?
            .set(LOCALE_COOKIE, locale.code());
        self.assignments
            .lock()
            .map_err(|_| I18nError::CookieStoreUnavailable { reason: "poisoned" })?
            .push(assignment);
        Ok(())
    }
}
