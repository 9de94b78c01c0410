//! Backend collaborators consumed by the page handlers.

use async_trait::async_trait;
use recipio_i18n::Locale;

use crate::account::{Credentials, Registration, Session, SignUpOutcome, UserProfile};
use crate::error::RecipeResult;
use crate::model::{CategoryInfo, FavoriteRecipe, RecipeCard, RecipeDetail, RecipeFilters};

/// Read access to published recipes and categories.
#[async_trait]
pub trait RecipeSource: Send + Sync {
    /// Full recipe row, `None` when no published recipe has this id.
    async fn recipe_detail(&self, recipe_id: i64) -> RecipeResult<Option<RecipeDetail>>;

    /// Published recipe cards, newest first.
    async fn public_recipes(&self, filters: &RecipeFilters) -> RecipeResult<Vec<RecipeCard>>;

    /// Category translations for `locale`.
    async fn categories(&self, locale: Locale) -> RecipeResult<Vec<CategoryInfo>>;

    /// One category translation by slug, `None` when unknown.
    async fn category_by_slug(
        &self,
        slug: &str,
        locale: Locale,
    ) -> RecipeResult<Option<CategoryInfo>>;
}

/// Authentication and per-user library operations.
#[async_trait]
pub trait AccountSource: Send + Sync {
    /// Exchange credentials for a session.
    async fn sign_in(&self, credentials: &Credentials) -> RecipeResult<Session>;

    /// Trade a one-time code from an emailed sign-in link for a session.
    async fn exchange_code(&self, code: &str) -> RecipeResult<Session>;

    /// Create an account.
    async fn sign_up(&self, registration: &Registration) -> RecipeResult<SignUpOutcome>;

    /// Revoke a session token.
    async fn sign_out(&self, access_token: &str) -> RecipeResult<()>;

    /// User behind a token, `None` when the token is not (or no longer) valid.
    async fn session(&self, access_token: &str) -> RecipeResult<Option<UserProfile>>;

    /// The user's favorites, most recent first.
    async fn favorites(&self, session: &Session) -> RecipeResult<Vec<FavoriteRecipe>>;

    /// Mark a recipe as favorite. Already-favorited recipes are left alone.
    async fn add_favorite(&self, session: &Session, recipe_id: i64) -> RecipeResult<()>;

    /// Remove a favorite. Missing favorites are not an error.
    async fn remove_favorite(&self, session: &Session, recipe_id: i64) -> RecipeResult<()>;
}
