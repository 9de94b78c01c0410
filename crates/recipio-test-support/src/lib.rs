#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Shared test helpers used across crate test suites.
//! Layout: fixtures.rs (sample recipes, categories, users), mocks.rs (in-memory backends).

pub mod fixtures;
pub mod mocks;
