#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls
)]
#![warn(
    missing_docs,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]

//! Locale handling for the Recipio site.
//!
//! Layout: `locale.rs` (supported locales and fallback order), `catalog.rs`
//! (embedded message catalogs), `cookie.rs` (cookie header codec and the
//! persisted locale cookie), `store.rs` (cookie sources and client-side
//! stores), `resolver.rs` (server and client locale resolution), `switch.rs`
//! (switch planning and reload targets), `client.rs` (client locale session),
//! `error.rs` (`I18nError`).

pub mod catalog;
pub mod client;
pub mod cookie;
pub mod error;
pub mod locale;
pub mod resolver;
pub mod store;
pub mod switch;

pub use catalog::{Catalogs, MessageCatalog};
pub use client::{ClientLocaleSession, ClientLocaleState, Navigator, RecordingNavigator};
pub use cookie::{CookieJar, LOCALE_COOKIE, LOCALE_COOKIE_MAX_AGE_SECS, LocaleCookie};
pub use error::{I18nError, I18nResult};
pub use locale::{DEFAULT_LOCALE, Locale};
pub use resolver::{resolve_client_locale, resolve_server_locale};
pub use store::{CookieSource, DocumentCookieStore, LocaleStore, MemoryLocaleStore, NoRequestCookies};
pub use switch::{LocaleSwitch, plan_locale_switch, reload_target, sanitize_next_path};
