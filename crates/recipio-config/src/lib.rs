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

//! Environment-backed configuration for the Recipio site.
//!
//! Layout: `model.rs` (typed configuration), `loader.rs` (environment
//! parsing), `defaults.rs` (fallback values), `error.rs` (`ConfigError`).

pub mod defaults;
pub mod error;
pub mod loader;
pub mod model;

pub use error::{ConfigError, ConfigResult};
pub use model::{AppConfig, BackendConfig, BasePath, LogSettings};
