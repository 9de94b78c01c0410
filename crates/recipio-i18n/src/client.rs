//! Client-side locale session.
//!
//! # Design
//! - The session starts `Unresolved` and renders with the server-provided
//!   locale so the first client paint matches the server markup.
//! - `mount` reads the persisted preference once and moves to `Resolved`.
//! - A switch writes the preference, then triggers a full reload; the session
//!   stays `Switching` until the page is replaced and keeps showing the old locale.

use std::sync::Mutex;

use recipio_config::BasePath;
use tracing::{debug, info, warn};

use crate::catalog::{Catalogs, MessageCatalog};
use crate::error::I18nResult;
use crate::locale::Locale;
use crate::resolver::resolve_client_locale;
use crate::store::LocaleStore;
use crate::switch::{LocaleSwitch, plan_locale_switch, reload_target};

/// Performs full-page navigations.
pub trait Navigator {
    /// Replace the current document with `url`.
    fn assign(&self, url: &str);
}

/// Navigator that records destinations instead of navigating.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    visits: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    /// Destinations assigned so far, oldest first.
    #[must_use]
    pub fn visits(&self) -> Vec<String> {
        self.visits
            .lock()
            .map(|visits| visits.clone())
            .unwrap_or_default()
    }
}

impl Navigator for RecordingNavigator {
    fn assign(&self, url: &str) {
        if let Ok(mut visits) = self.visits.lock() {
            visits.push(url.to_string());
        }
    }
}

/// Lifecycle of the client locale.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClientLocaleState {
    /// Before mount; the server-provided locale is displayed.
    Unresolved,
    /// The persisted preference has been read.
    Resolved(Locale),
    /// A switch was committed and a reload is in flight.
    Switching {
        /// Locale still on screen.
        from: Locale,
        /// Locale the reload will render.
        to: Locale,
    },
}

/// Locale state for one page lifetime in the browser.
#[derive(Debug)]
pub struct ClientLocaleSession<S, N> {
    store: S,
    navigator: N,
    base: BasePath,
    initial: Locale,
    state: ClientLocaleState,
}

impl<S, N> ClientLocaleSession<S, N>
where
    S: LocaleStore,
    N: Navigator,
{
    /// Session for a page that the server rendered in `initial`.
    #[must_use]
    pub const fn new(store: S, navigator: N, base: BasePath, initial: Locale) -> Self {
        Self {
            store,
            navigator,
            base,
            initial,
            state: ClientLocaleState::Unresolved,
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> ClientLocaleState {
        self.state
    }

    /// Locale the page should render in right now.
    #[must_use]
    pub const fn display_locale(&self) -> Locale {
        match self.state {
            ClientLocaleState::Unresolved => self.initial,
            ClientLocaleState::Resolved(locale) => locale,
            ClientLocaleState::Switching { from, .. } => from,
        }
    }

    /// Catalog matching [`Self::display_locale`].
    #[must_use]
    pub const fn catalog<'a>(&self, catalogs: &'a Catalogs) -> &'a MessageCatalog {
        catalogs.get(self.display_locale())
    }

    /// Read the persisted preference. Only the first call consults the store.
    pub fn mount(&mut self) -> Locale {
        if self.state == ClientLocaleState::Unresolved {
            let locale = resolve_client_locale(&self.store);
            if locale != self.initial {
                debug!(
                    server = %self.initial,
                    client = %locale,
                    "client locale differs from server render"
                );
            }
            self.state = ClientLocaleState::Resolved(locale);
        }
        self.display_locale()
    }

    /// Switch to `requested`, persisting it and reloading `current_path`.
    ///
    /// Unsupported values are ignored, the active locale is a no-op, and
    /// requests made while a reload is pending are dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the preference cannot be persisted; no navigation
    /// happens in that case.
    pub fn switch_locale(&mut self, requested: &str, current_path: &str) -> I18nResult<LocaleSwitch> {
        if let ClientLocaleState::Switching { to, .. } = self.state {
            debug!(requested, pending = %to, "locale switch already in flight");
            return Ok(LocaleSwitch::Pending { to });
        }
        let active = self.display_locale();
        let plan = plan_locale_switch(active, requested);
        match &plan {
            LocaleSwitch::Ignored { requested } => {
                warn!(requested = %requested, "ignoring unsupported locale");
            }
            LocaleSwitch::Switch(next) => {
                self.store.write(*next)?;
                self.state = ClientLocaleState::Switching {
                    from: active,
                    to: *next,
                };
                let target = reload_target(&self.base, current_path);
                info!(from = %active, to = %next, target = %target, "switching locale");
                self.navigator.assign(&target);
            }
            LocaleSwitch::Unchanged(_) | LocaleSwitch::Pending { .. } => {}
        }
        Ok(plan)
    }

    /// Persisted-preference store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Navigator used for reloads.
    #[must_use]
    pub const fn navigator(&self) -> &N {
        &self.navigator
    }
}
