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

//! HTTP surface for the Recipio site.
//!
//! Layout: `http/router.rs` (router and server host), `http/locale.rs`
//! (per-request locale resolution, locale switching, message catalogs),
//! `http/pages.rs` (home, listing, detail, and category payloads),
//! `http/account.rs` (sign-in, sign-up, profile, favorites),
//! `http/session.rs` (session cookie and guard), `http/health.rs`,
//! `http/telemetry.rs` (request metrics), `http/errors.rs` (problem
//! responses), `models.rs` (payload DTOs), `state.rs` (`ApiState`),
//! `error.rs` (`ApiServerError`).

pub mod error;
pub mod http;
pub mod models;
pub(crate) mod state;

pub use error::{ApiServerError, ApiServerResult};
pub use http::router::ApiServer;
