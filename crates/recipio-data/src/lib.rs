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

//! Client for the hosted backend that stores recipes and accounts.
//!
//! Layout: `client.rs` (HTTP plumbing, headers, status handling),
//! `recipes.rs` (`RecipeSource` over the public views), `auth.rs`
//! (`AccountSource` over the auth API and the user library), `error.rs`
//! (`DataError`).

pub mod auth;
pub mod client;
pub mod error;
pub mod recipes;

pub use client::SupabaseClient;
pub use error::{DataError, Result};
