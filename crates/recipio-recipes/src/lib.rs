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

//! Recipe read models and their projection into a single language.
//!
//! Layout: `model.rs` (backend view rows), `localize.rs` (detail
//! localisation and serving-size resolution), `cards.rs` (card, category,
//! and favorite projections), `account.rs` (users, sessions, sign-up rules),
//! `source.rs` (backend collaborator traits), `error.rs` (`RecipeError`).

pub mod account;
pub mod cards;
pub mod error;
pub mod localize;
pub mod model;
pub mod source;

pub use account::{
    Credentials, MIN_PASSWORD_LEN, PasswordIssue, Registration, Session, SignUpOutcome,
    UserProfile, display_name, validate_password,
};
pub use cards::{CategoryCard, LocalizedCard, category_card, localize_card, localize_favorite};
pub use error::{RecipeError, RecipeResult};
pub use localize::{
    DEFAULT_SERVINGS, LocalizedRecipe, PageMetadata, SITE_NAME, available_servings, default_servings,
    format_date, ingredients_for_servings, localize, not_found_metadata, page_metadata,
    page_title, select_servings,
};
pub use model::{
    CategoryInfo, CategoryRef, FavoriteRecipe, Ingredient, RecipeCard, RecipeDetail,
    RecipeFilters, RecipeStep, RecipeVariant,
};
pub use source::{AccountSource, RecipeSource};
