//! In-memory stand-ins for the hosted backend.
//!
//! Both fakes share state behind `Arc`, so a clone handed to the router still
//! reflects writes and failure toggles made by the test.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use recipio_i18n::Locale;
use recipio_recipes::{
    AccountSource, CategoryInfo, Credentials, FavoriteRecipe, RecipeCard, RecipeDetail,
    RecipeError, RecipeFilters, RecipeResult, RecipeSource, Registration, Session, SignUpOutcome,
    UserProfile,
};
use tokio::sync::Mutex;

use crate::fixtures;

fn injected(operation: &'static str) -> RecipeError {
    RecipeError::backend(operation, std::io::Error::other("injected backend failure"))
}

#[derive(Default)]
struct RecipeState {
    details: HashMap<i64, RecipeDetail>,
    cards: Vec<RecipeCard>,
    categories: Vec<CategoryInfo>,
}

/// Recipe catalogue held in memory.
#[derive(Clone, Default)]
pub struct InMemoryRecipes {
    state: Arc<Mutex<RecipeState>>,
    failing: Arc<AtomicBool>,
    calls: Arc<AtomicUsize>,
}

impl InMemoryRecipes {
    /// Empty catalogue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalogue seeded with the sample recipes and both category translations.
    #[must_use]
    pub fn seeded() -> Self {
        let mut state = RecipeState {
            cards: fixtures::recipe_cards(),
            ..RecipeState::default()
        };
        for recipe in [fixtures::lentil_soup(), fixtures::english_only_pilaf()] {
            state.details.insert(recipe.recipe_id, recipe);
        }
        state.categories = Locale::all()
            .into_iter()
            .flat_map(fixtures::categories)
            .collect();
        Self {
            state: Arc::new(Mutex::new(state)),
            ..Self::default()
        }
    }

    /// Add or replace a recipe detail row.
    pub async fn insert_detail(&self, recipe: RecipeDetail) {
        self.state
            .lock()
            .await
            .details
            .insert(recipe.recipe_id, recipe);
    }

    /// Make every subsequent call fail with a backend error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of calls received.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn enter(&self, operation: &'static str) -> RecipeResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(injected(operation));
        }
        Ok(())
    }
}

fn title_matches(card: &RecipeCard, term: &str) -> bool {
    let term = term.to_lowercase();
    [card.title_en.as_deref(), card.title_tr.as_deref()]
        .into_iter()
        .flatten()
        .any(|title| title.to_lowercase().contains(&term))
}

#[async_trait]
impl RecipeSource for InMemoryRecipes {
    async fn recipe_detail(&self, recipe_id: i64) -> RecipeResult<Option<RecipeDetail>> {
        self.enter("recipe_detail")?;
        Ok(self.state.lock().await.details.get(&recipe_id).cloned())
    }

    async fn public_recipes(&self, filters: &RecipeFilters) -> RecipeResult<Vec<RecipeCard>> {
        self.enter("public_recipes")?;
        let state = self.state.lock().await;
        let mut cards: Vec<RecipeCard> = state
            .cards
            .iter()
            .filter(|card| {
                filters
                    .category_slug()
                    .is_none_or(|slug| card.category_slug.as_deref() == Some(slug))
            })
            .filter(|card| filters.search_term().is_none_or(|term| title_matches(card, term)))
            .cloned()
            .collect();
        cards.sort_by(|left, right| right.created_at.cmp(&left.created_at));
        let offset = filters.offset.unwrap_or(0) as usize;
        let limit = filters.limit.map_or(usize::MAX, |limit| limit as usize);
        Ok(cards.into_iter().skip(offset).take(limit).collect())
    }

    async fn categories(&self, locale: Locale) -> RecipeResult<Vec<CategoryInfo>> {
        self.enter("categories")?;
        let state = self.state.lock().await;
        Ok(state
            .categories
            .iter()
            .filter(|category| category.locale == locale.code())
            .cloned()
            .collect())
    }

    async fn category_by_slug(
        &self,
        slug: &str,
        locale: Locale,
    ) -> RecipeResult<Option<CategoryInfo>> {
        self.enter("category_by_slug")?;
        let state = self.state.lock().await;
        Ok(state
            .categories
            .iter()
            .find(|category| category.locale == locale.code() && category.categories.slug == slug)
            .cloned())
    }
}

struct Account {
    password: String,
    confirmed: bool,
    profile: UserProfile,
    favorites: Vec<i64>,
}

#[derive(Default)]
struct AccountState {
    accounts: HashMap<String, Account>,
    tokens: HashMap<String, String>,
    auth_codes: HashMap<String, String>,
    library: HashMap<i64, FavoriteRecipe>,
    next_token: usize,
}

impl AccountState {
    fn account_for_token(&mut self, token: &str) -> Option<&mut Account> {
        let email = self.tokens.get(token)?.clone();
        self.accounts.get_mut(&email)
    }

    fn issue_token(&mut self, email: &str) -> String {
        self.next_token += 1;
        let token = format!("token-{}", self.next_token);
        self.tokens.insert(token.clone(), email.to_string());
        token
    }
}

/// Auth backend and favorites library held in memory.
#[derive(Clone, Default)]
pub struct InMemoryAccounts {
    state: Arc<Mutex<AccountState>>,
    failing: Arc<AtomicBool>,
    confirm_on_sign_up: Arc<AtomicBool>,
}

impl InMemoryAccounts {
    /// No accounts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// One confirmed account ([`fixtures::user`]) holding an active
    /// [`fixtures::session`] and the sample recipes in its library catalogue.
    #[must_use]
    pub fn seeded() -> Self {
        let user = fixtures::user();
        let email = user.email.clone().unwrap_or_default();
        let mut state = AccountState::default();
        state.tokens.insert(fixtures::ACCESS_TOKEN.to_string(), email.clone());
        state.accounts.insert(
            email,
            Account {
                password: fixtures::USER_PASSWORD.to_string(),
                confirmed: true,
                profile: user,
                favorites: Vec::new(),
            },
        );
        for recipe in [fixtures::lentil_soup(), fixtures::english_only_pilaf()] {
            state
                .library
                .insert(recipe.recipe_id, fixtures::favorite(&recipe));
        }
        Self {
            state: Arc::new(Mutex::new(state)),
            ..Self::default()
        }
    }

    /// Register an account whose email has not been confirmed.
    pub async fn insert_unconfirmed(&self, email: &str, password: &str) {
        self.state.lock().await.accounts.insert(
            email.to_string(),
            Account {
                password: password.to_string(),
                confirmed: false,
                profile: UserProfile {
                    id: format!("user-{email}"),
                    email: Some(email.to_string()),
                    ..UserProfile::default()
                },
                favorites: Vec::new(),
            },
        );
    }

    /// Mint a single-use sign-in link code for `email`.
    pub async fn issue_auth_code(&self, email: &str) -> String {
        let mut state = self.state.lock().await;
        let code = format!("code-{}", state.auth_codes.len() + 1);
        state.auth_codes.insert(code.clone(), email.to_string());
        code
    }

    /// Whether sign-up issues a session immediately instead of asking for confirmation.
    pub fn set_confirm_on_sign_up(&self, confirm: bool) {
        self.confirm_on_sign_up.store(confirm, Ordering::SeqCst);
    }

    /// Make every subsequent call fail with a backend error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Favorite recipe ids of `email`, most recent first.
    pub async fn favorite_ids(&self, email: &str) -> Vec<i64> {
        self.state
            .lock()
            .await
            .accounts
            .get(email)
            .map(|account| account.favorites.clone())
            .unwrap_or_default()
    }

    /// Whether `token` still maps to a user.
    pub async fn token_active(&self, token: &str) -> bool {
        self.state.lock().await.tokens.contains_key(token)
    }

    fn enter(&self, operation: &'static str) -> RecipeResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(injected(operation));
        }
        Ok(())
    }
}

#[async_trait]
impl AccountSource for InMemoryAccounts {
    async fn sign_in(&self, credentials: &Credentials) -> RecipeResult<Session> {
        self.enter("sign_in")?;
        let mut state = self.state.lock().await;
        let user = match state.accounts.get(&credentials.email) {
            Some(account) if account.password != credentials.password => {
                return Err(RecipeError::InvalidCredentials);
            }
            Some(account) if !account.confirmed => {
                return Err(RecipeError::EmailConfirmationRequired);
            }
            Some(account) => account.profile.clone(),
            None => return Err(RecipeError::InvalidCredentials),
        };
        let access_token = state.issue_token(&credentials.email);
        Ok(Session { access_token, user })
    }

    async fn exchange_code(&self, code: &str) -> RecipeResult<Session> {
        self.enter("exchange_code")?;
        let mut state = self.state.lock().await;
        let rejected = || RecipeError::AuthCodeRejected {
            reason: "Code has expired or is invalid".to_string(),
        };
        let email = state.auth_codes.remove(code).ok_or_else(rejected)?;
        let user = match state.accounts.get_mut(&email) {
            Some(account) => {
                account.confirmed = true;
                account.profile.clone()
            }
            None => return Err(rejected()),
        };
        let access_token = state.issue_token(&email);
        Ok(Session { access_token, user })
    }

    async fn sign_up(&self, registration: &Registration) -> RecipeResult<SignUpOutcome> {
        self.enter("sign_up")?;
        let mut state = self.state.lock().await;
        if state.accounts.contains_key(&registration.email) {
            return Err(RecipeError::RegistrationRejected {
                reason: "User already registered".to_string(),
            });
        }
        let confirmed = self.confirm_on_sign_up.load(Ordering::SeqCst);
        let user = UserProfile {
            id: format!("user-{}", registration.email),
            email: Some(registration.email.clone()),
            full_name: None,
            display_name: registration.display_name.clone(),
        };
        state.accounts.insert(
            registration.email.clone(),
            Account {
                password: registration.password.clone(),
                confirmed,
                profile: user.clone(),
                favorites: Vec::new(),
            },
        );
        if !confirmed {
            return Ok(SignUpOutcome::ConfirmationRequired);
        }
        let access_token = state.issue_token(&registration.email);
        Ok(SignUpOutcome::SignedIn(Session { access_token, user }))
    }

    async fn sign_out(&self, access_token: &str) -> RecipeResult<()> {
        self.enter("sign_out")?;
        self.state.lock().await.tokens.remove(access_token);
        Ok(())
    }

    async fn session(&self, access_token: &str) -> RecipeResult<Option<UserProfile>> {
        self.enter("session")?;
        let mut state = self.state.lock().await;
        Ok(state
            .account_for_token(access_token)
            .map(|account| account.profile.clone()))
    }

    async fn favorites(&self, session: &Session) -> RecipeResult<Vec<FavoriteRecipe>> {
        self.enter("favorites")?;
        let mut state = self.state.lock().await;
        let ids = state
            .account_for_token(&session.access_token)
            .map(|account| account.favorites.clone())
            .unwrap_or_default();
        Ok(ids
            .into_iter()
            .map(|recipe_id| {
                state
                    .library
                    .get(&recipe_id)
                    .cloned()
                    .unwrap_or(FavoriteRecipe {
                        recipe_id,
                        title_en: None,
                        title_tr: None,
                        description_en: None,
                        description_tr: None,
                        cover_image_url: None,
                        category_slug: None,
                    })
            })
            .collect())
    }

    async fn add_favorite(&self, session: &Session, recipe_id: i64) -> RecipeResult<()> {
        self.enter("add_favorite")?;
        let mut state = self.state.lock().await;
        if let Some(account) = state.account_for_token(&session.access_token)
            && !account.favorites.contains(&recipe_id)
        {
            account.favorites.insert(0, recipe_id);
        }
        Ok(())
    }

    async fn remove_favorite(&self, session: &Session, recipe_id: i64) -> RecipeResult<()> {
        self.enter("remove_favorite")?;
        let mut state = self.state.lock().await;
        if let Some(account) = state.account_for_token(&session.access_token) {
            account.favorites.retain(|id| *id != recipe_id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn seeded_recipes_filter_and_page() -> RecipeResult<()> {
        let recipes = InMemoryRecipes::seeded();
        let soups = recipes
            .public_recipes(&RecipeFilters {
                category: Some("soups".to_string()),
                ..RecipeFilters::default()
            })
            .await?;
        assert_eq!(soups.len(), 1);

        let search = recipes
            .public_recipes(&RecipeFilters {
                search: Some("MERCIMEK".to_string()),
                ..RecipeFilters::default()
            })
            .await?;
        assert_eq!(search.len(), 1);

        let paged = recipes
            .public_recipes(&RecipeFilters {
                limit: Some(1),
                offset: Some(1),
                ..RecipeFilters::default()
            })
            .await?;
        assert_eq!(paged[0].recipe_id, fixtures::LENTIL_SOUP_ID);
        Ok(())
    }

    #[tokio::test]
    async fn failure_toggle_reports_operation() {
        let recipes = InMemoryRecipes::seeded();
        recipes.set_failing(true);
        let err = recipes.categories(Locale::Tr).await.err();
        assert_eq!(err.and_then(|err| err.operation()), Some("categories"));
        assert_eq!(recipes.calls(), 1);
    }

    #[tokio::test]
    async fn accounts_track_favorites_per_token() -> RecipeResult<()> {
        let accounts = InMemoryAccounts::seeded();
        let session = fixtures::session();
        accounts.add_favorite(&session, fixtures::LENTIL_SOUP_ID).await?;
        accounts.add_favorite(&session, fixtures::PILAF_ID).await?;
        accounts.add_favorite(&session, fixtures::LENTIL_SOUP_ID).await?;
        assert_eq!(
            accounts.favorite_ids(fixtures::USER_EMAIL).await,
            vec![fixtures::PILAF_ID, fixtures::LENTIL_SOUP_ID]
        );
        let favorites = accounts.favorites(&session).await?;
        assert_eq!(favorites[0].title_en.as_deref(), Some("Rice Pilaf"));

        accounts.sign_out(&session.access_token).await?;
        assert!(!accounts.token_active(&session.access_token).await);
        Ok(())
    }

    #[tokio::test]
    async fn sign_in_rules() -> RecipeResult<()> {
        let accounts = InMemoryAccounts::seeded();
        accounts.insert_unconfirmed("new@example.com", "secret1").await;
        let wrong = accounts
            .sign_in(&Credentials {
                email: fixtures::USER_EMAIL.to_string(),
                password: "nope".to_string(),
            })
            .await;
        assert!(matches!(wrong, Err(RecipeError::InvalidCredentials)));

        let pending = accounts
            .sign_in(&Credentials {
                email: "new@example.com".to_string(),
                password: "secret1".to_string(),
            })
            .await;
        assert!(matches!(pending, Err(RecipeError::EmailConfirmationRequired)));

        let session = accounts
            .sign_in(&Credentials {
                email: fixtures::USER_EMAIL.to_string(),
                password: fixtures::USER_PASSWORD.to_string(),
            })
            .await?;
        assert_eq!(accounts.session(&session.access_token).await?, Some(fixtures::user()));
        Ok(())
    }

    #[tokio::test]
    async fn auth_codes_confirm_and_are_single_use() -> RecipeResult<()> {
        let accounts = InMemoryAccounts::seeded();
        accounts.insert_unconfirmed("new@example.com", "secret1").await;
        let code = accounts.issue_auth_code("new@example.com").await;

        let session = accounts.exchange_code(&code).await?;
        assert!(accounts.token_active(&session.access_token).await);
        assert_eq!(session.user.email.as_deref(), Some("new@example.com"));

        let replay = accounts.exchange_code(&code).await;
        assert!(matches!(replay, Err(RecipeError::AuthCodeRejected { .. })));

        let signed_in = accounts
            .sign_in(&Credentials {
                email: "new@example.com".to_string(),
                password: "secret1".to_string(),
            })
            .await;
        assert!(signed_in.is_ok());
        Ok(())
    }
}
