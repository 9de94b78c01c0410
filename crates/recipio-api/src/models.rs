//! Request and response payloads for the HTTP surface.
//!
//! Every page payload carries the locale it was rendered for, so a client can
//! set the document `lang` attribute without resolving the cookie again.

use std::collections::BTreeMap;

use recipio_i18n::Locale;
use recipio_recipes::{
    CategoryCard, Ingredient, LocalizedCard, LocalizedRecipe, PageMetadata, UserProfile,
};
use recipio_telemetry::MetricsSnapshot;
use serde::{Deserialize, Serialize};

/// RFC9457-compatible problem document surfaced on validation/runtime errors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProblemDetails {
    /// Problem type URI.
    #[serde(rename = "type")]
    pub kind: String,
    /// Constant, human-readable summary.
    pub title: String,
    /// HTTP status code.
    pub status: u16,
    /// Localised explanation for this occurrence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Fields that failed validation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invalid_params: Option<Vec<ProblemInvalidParam>>,
    /// `x-request-id` of the failed request, when known.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub request_id: Option<String>,
}

/// Invalid parameter pointer surfaced alongside a [`ProblemDetails`] payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProblemInvalidParam {
    /// JSON pointer to the offending field.
    pub pointer: String,
    /// Localised message.
    pub message: String,
}

/// Locale a payload was rendered for.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct LocaleContext {
    /// Active locale code.
    pub locale: Locale,
    /// Value for the document `lang` attribute.
    pub lang: &'static str,
    /// Locale offered by the language switcher.
    pub alternate: Locale,
}

impl From<Locale> for LocaleContext {
    fn from(locale: Locale) -> Self {
        Self {
            locale,
            lang: locale.html_lang(),
            alternate: locale.other(),
        }
    }
}

/// Hero block of the home page.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct HeroView {
    /// Small badge above the title.
    pub badge: String,
    /// Headline.
    pub title: String,
    /// Supporting copy.
    pub description: String,
    /// Call-to-action label.
    pub call_to_action: String,
}

/// `GET /`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct HomePage {
    /// Active locale.
    #[serde(flatten)]
    pub context: LocaleContext,
    /// Hero copy.
    pub hero: HeroView,
    /// Heading above the featured recipes.
    pub featured_heading: String,
    /// Newest recipes.
    pub featured_recipes: Vec<LocalizedCard>,
    /// Heading above the featured categories.
    pub categories_heading: String,
    /// Categories to browse.
    pub featured_categories: Vec<CategoryCard>,
}

/// Query string of `GET /recipes`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct RecipeListQuery {
    /// Title search in either language.
    #[serde(default)]
    pub search: Option<String>,
    /// Category slug.
    #[serde(default)]
    pub category: Option<String>,
    /// Page size.
    #[serde(default)]
    pub limit: Option<u32>,
    /// Rows to skip.
    #[serde(default)]
    pub offset: Option<u32>,
}

/// `GET /recipes`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RecipeListPage {
    /// Active locale.
    #[serde(flatten)]
    pub context: LocaleContext,
    /// Page heading; names the search term when one was given.
    pub heading: String,
    /// Trimmed search term.
    pub search: Option<String>,
    /// Trimmed category slug.
    pub category: Option<String>,
    /// Matching recipes, newest first.
    pub recipes: Vec<LocalizedCard>,
    /// Message to show instead of an empty grid.
    pub empty_message: Option<String>,
}

/// Query string of `GET /recipes/{id}`.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
pub struct ServingsQuery {
    /// Requested serving count.
    #[serde(default)]
    pub servings: Option<u32>,
}

/// Serving-size selector.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ServingsView {
    /// Counts offered.
    pub available: Vec<u32>,
    /// Count the ingredient list was resolved for.
    pub selected: u32,
    /// Localised label for the selected count.
    pub label: String,
}

/// Localised section headings of the detail page.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DetailLabels {
    /// Ingredients heading.
    pub ingredients: String,
    /// Instructions heading.
    pub instructions: String,
    /// Tips heading.
    pub tips: String,
    /// Servings selector label.
    pub servings: String,
    /// "Published on" prefix.
    pub published_on: String,
    /// "Last updated" prefix.
    pub last_updated: String,
}

/// `GET /recipes/{id}`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RecipeDetailPage {
    /// Active locale.
    #[serde(flatten)]
    pub context: LocaleContext,
    /// Head metadata.
    pub metadata: PageMetadata,
    /// Localised recipe fields.
    pub recipe: LocalizedRecipe,
    /// Cover photo.
    pub cover_image_url: Option<String>,
    /// Serving selector state.
    pub servings: ServingsView,
    /// Ingredients for the selected serving count.
    pub ingredients: Vec<Ingredient>,
    /// Message to show instead of an empty ingredient list.
    pub ingredients_empty_message: Option<String>,
    /// Message to show instead of an empty step list.
    pub steps_empty_message: Option<String>,
    /// Section headings.
    pub labels: DetailLabels,
    /// Publication date in the locale's long form.
    pub published_on: String,
    /// Last update in the locale's long form.
    pub last_updated: String,
    /// Views.
    pub view_count: u64,
    /// Favorites.
    pub favorite_count: u64,
    /// Comments.
    pub comment_count: u64,
}

/// `GET /categories`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CategoriesPage {
    /// Active locale.
    #[serde(flatten)]
    pub context: LocaleContext,
    /// Page heading.
    pub title: String,
    /// Page intro.
    pub description: String,
    /// Category cards.
    pub categories: Vec<CategoryCard>,
    /// Message to show instead of an empty grid.
    pub empty_message: Option<String>,
}

/// `GET /categories/{slug}`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CategoryPage {
    /// Active locale.
    #[serde(flatten)]
    pub context: LocaleContext,
    /// The category.
    pub category: CategoryCard,
    /// Heading above the recipe grid.
    pub recipes_heading: String,
    /// Recipes in the category, newest first.
    pub recipes: Vec<LocalizedCard>,
    /// Message to show instead of an empty grid.
    pub empty_message: Option<String>,
}

/// Footer link to a legal document.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LegalLink {
    /// Site path of the document.
    pub href: String,
    /// Localized link label.
    pub label: String,
}

/// `GET /legal/{page}`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LegalPage {
    /// Active locale.
    #[serde(flatten)]
    pub context: LocaleContext,
    /// Document slug: `terms`, `privacy`, or `kvkk`.
    pub page: String,
    /// Heading.
    pub title: String,
    /// Summary, also used as the meta description.
    pub description: String,
    /// `<title>` of the document.
    pub document_title: String,
    /// Every legal document, for the footer.
    pub links: Vec<LegalLink>,
}

/// Query string of `GET /locale-switching`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct LocaleSwitchQuery {
    /// Requested locale code.
    #[serde(default)]
    pub locale: Option<String>,
    /// Path to reload after switching.
    #[serde(default)]
    pub next: Option<String>,
}

/// Query string of `GET /auth/callback`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct AuthCallbackQuery {
    /// One-time code from the emailed sign-in link.
    #[serde(default)]
    pub code: Option<String>,
    /// Path to land on once signed in.
    #[serde(default)]
    pub next: Option<String>,
}

/// `GET /i18n/messages`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MessagesResponse {
    /// Active locale.
    #[serde(flatten)]
    pub context: LocaleContext,
    /// Flat dot-path catalog with fallbacks applied.
    pub messages: BTreeMap<String, String>,
}

/// `POST /auth/signup` body.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SignUpRequest {
    /// Account email.
    pub email: String,
    /// Chosen password.
    pub password: String,
    /// Password confirmation.
    pub confirm_password: String,
    /// Optional display name.
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Signed-in user returned by sign-in and sign-up.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SessionResponse {
    /// The user.
    pub user: UserProfile,
    /// Name to greet the user with.
    pub display_name: Option<String>,
}

/// Outcome of `POST /auth/signup`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SignUpResponse {
    /// The account is active and the session cookie was set.
    SignedIn {
        /// The new user.
        user: UserProfile,
        /// Name to greet the user with.
        display_name: Option<String>,
    },
    /// The user must confirm their email first.
    ConfirmationRequired {
        /// Localised instructions.
        message: String,
    },
}

/// `GET /profile`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ProfilePage {
    /// Active locale.
    #[serde(flatten)]
    pub context: LocaleContext,
    /// Name shown in the header.
    pub display_name: String,
    /// Account email.
    pub email: Option<String>,
    /// Favorite recipes, most recent first.
    pub favorites: Vec<LocalizedCard>,
    /// Message to show instead of an empty list.
    pub empty_message: Option<String>,
}

/// `GET /health`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct HealthResponse {
    /// Always `ok` while the process serves requests.
    pub status: &'static str,
    /// Build identifier.
    pub build: String,
    /// Selected counters.
    pub metrics: MetricsSnapshot,
}
