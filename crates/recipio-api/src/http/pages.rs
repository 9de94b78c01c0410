//! Page payloads: home, recipe listing, recipe detail, categories, legal.
//!
//! # Design
//! - Every handler reads the locale resolved by the locale middleware; none
//!   of them looks at cookies.
//! - Missing translations and serving variants render as empty states; only
//!   a missing recipe or category is a 404.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
};
use recipio_recipes::{
    LocalizedCard, RecipeFilters, SITE_NAME, available_servings, category_card, format_date,
    ingredients_for_servings, localize, localize_card, page_metadata, select_servings,
};
use tracing::debug;

use crate::http::constants::{
    DEFAULT_PAGE_SIZE, FEATURED_CATEGORIES, FEATURED_RECIPES, MAX_PAGE_SIZE,
};
use crate::http::errors::ApiError;
use crate::http::locale::current_locale;
use crate::models::{
    CategoriesPage, CategoryPage, DetailLabels, HeroView, HomePage, LegalLink, LegalPage,
    RecipeDetailPage, RecipeListPage, RecipeListQuery, ServingsQuery, ServingsView,
};
use crate::state::ApiState;

fn empty_message(state: &ApiState, is_empty: bool, key: &str) -> Option<String> {
    is_empty.then(|| state.text(current_locale(), key))
}

fn trimmed(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToString::to_string)
}

/// `GET /`.
pub(crate) async fn home(State(state): State<Arc<ApiState>>) -> Result<Json<HomePage>, ApiError> {
    let locale = current_locale();
    let filters = RecipeFilters {
        limit: Some(FEATURED_RECIPES),
        ..RecipeFilters::default()
    };
    let (cards, categories) = tokio::try_join!(
        state.recipes.public_recipes(&filters),
        state.recipes.categories(locale),
    )?;
    state.page_rendered("home", locale);
    Ok(Json(HomePage {
        context: locale.into(),
        hero: HeroView {
            badge: state.text(locale, "HomePage.heroBadge"),
            title: state.text(locale, "HomePage.heroTitle"),
            description: state.text(locale, "HomePage.heroDescription"),
            call_to_action: state.text(locale, "HomePage.browseRecipes"),
        },
        featured_heading: state.text(locale, "HomePage.featuredRecipes"),
        featured_recipes: cards
            .iter()
            .map(|card| localize_card(card, locale))
            .collect(),
        categories_heading: state.text(locale, "HomePage.browseByCategory"),
        featured_categories: categories
            .iter()
            .take(FEATURED_CATEGORIES)
            .map(category_card)
            .collect(),
    }))
}

/// `GET /recipes`.
pub(crate) async fn list_recipes(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<RecipeListQuery>,
) -> Result<Json<RecipeListPage>, ApiError> {
    let locale = current_locale();
    let filters = RecipeFilters {
        category: trimmed(query.category.as_deref()),
        search: trimmed(query.search.as_deref()),
        limit: Some(query.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)),
        offset: query.offset,
    };
    let cards = state.recipes.public_recipes(&filters).await?;
    let recipes: Vec<LocalizedCard> = cards
        .iter()
        .map(|card| localize_card(card, locale))
        .collect();
    let heading = filters.search.as_deref().map_or_else(
        || state.text(locale, "Header.recipes"),
        |term| {
            state
                .catalogs
                .format(locale, "HomePage.searchResultsFor", &[("query", term)])
        },
    );
    state.page_rendered("recipes", locale);
    Ok(Json(RecipeListPage {
        context: locale.into(),
        heading,
        empty_message: empty_message(&state, recipes.is_empty(), "HomePage.noRecipesFound"),
        search: filters.search,
        category: filters.category,
        recipes,
    }))
}

/// Recipe id from a path segment; anything but a decimal integer names no recipe.
pub(crate) fn parse_recipe_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse().map_err(|_| {
        debug!(raw, "recipe id is not numeric");
        ApiError::not_found("RecipeDetail.notFound")
    })
}

/// `GET /recipes/{id}?servings=N`.
pub(crate) async fn recipe_detail(
    State(state): State<Arc<ApiState>>,
    Path(recipe_id): Path<String>,
    Query(query): Query<ServingsQuery>,
) -> Result<Json<RecipeDetailPage>, ApiError> {
    let locale = current_locale();
    let recipe_id = parse_recipe_id(&recipe_id)?;
    let Some(recipe) = state.recipes.recipe_detail(recipe_id).await? else {
        debug!(recipe_id, "recipe not found");
        return Err(ApiError::not_found("RecipeDetail.notFound"));
    };
    let view = localize(&recipe, locale);
    let selected = select_servings(&recipe, query.servings);
    let ingredients = ingredients_for_servings(&recipe, selected, locale).to_vec();
    let text = |key: &str| state.text(locale, key);
    let page = RecipeDetailPage {
        context: locale.into(),
        metadata: page_metadata(&recipe, &view),
        cover_image_url: recipe.cover_image_url.clone(),
        servings: ServingsView {
            available: available_servings(&recipe),
            selected,
            label: state.catalogs.format(
                locale,
                "RecipeDetail.portionLabel",
                &[("count", &selected.to_string())],
            ),
        },
        ingredients_empty_message: empty_message(
            &state,
            ingredients.is_empty(),
            "RecipeDetail.noIngredients",
        ),
        ingredients,
        steps_empty_message: empty_message(&state, view.steps.is_empty(), "RecipeDetail.noSteps"),
        labels: DetailLabels {
            ingredients: text("RecipeDetail.ingredients"),
            instructions: text("RecipeDetail.instructions"),
            tips: text("RecipeDetail.tips"),
            servings: text("RecipeDetail.servings"),
            published_on: text("RecipeDetail.publishedOn"),
            last_updated: text("RecipeDetail.lastUpdated"),
        },
        published_on: format_date(recipe.created_at, locale),
        last_updated: format_date(recipe.updated_at, locale),
        view_count: recipe.view_count,
        favorite_count: recipe.favorite_count,
        comment_count: recipe.comment_count,
        recipe: view,
    };
    state.page_rendered("recipe_detail", locale);
    Ok(Json(page))
}

/// `GET /categories`.
pub(crate) async fn list_categories(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<CategoriesPage>, ApiError> {
    let locale = current_locale();
    let categories: Vec<_> = state
        .recipes
        .categories(locale)
        .await?
        .iter()
        .map(category_card)
        .collect();
    state.page_rendered("categories", locale);
    Ok(Json(CategoriesPage {
        context: locale.into(),
        title: state.text(locale, "CategoriesPage.title"),
        description: state.text(locale, "CategoriesPage.description"),
        empty_message: empty_message(&state, categories.is_empty(), "CategoriesPage.noCategories"),
        categories,
    }))
}

/// `GET /categories/{slug}`.
pub(crate) async fn category_detail(
    State(state): State<Arc<ApiState>>,
    Path(slug): Path<String>,
) -> Result<Json<CategoryPage>, ApiError> {
    let locale = current_locale();
    let Some(category) = state.recipes.category_by_slug(&slug, locale).await? else {
        debug!(slug = %slug, "category not found");
        return Err(ApiError::not_found("CategoryPage.notFound"));
    };
    let filters = RecipeFilters {
        category: Some(category.categories.slug.clone()),
        limit: Some(MAX_PAGE_SIZE),
        ..RecipeFilters::default()
    };
    let recipes: Vec<LocalizedCard> = state
        .recipes
        .public_recipes(&filters)
        .await?
        .iter()
        .map(|card| localize_card(card, locale))
        .collect();
    state.page_rendered("category", locale);
    Ok(Json(CategoryPage {
        context: locale.into(),
        category: category_card(&category),
        recipes_heading: state.text(locale, "CategoryPage.recipes"),
        empty_message: empty_message(&state, recipes.is_empty(), "CategoryPage.noRecipes"),
        recipes,
    }))
}

struct LegalDocument {
    slug: &'static str,
    link_key: &'static str,
    title_key: &'static str,
    description_key: &'static str,
}

const LEGAL_DOCUMENTS: [LegalDocument; 3] = [
    LegalDocument {
        slug: "terms",
        link_key: "Footer.terms",
        title_key: "Legal.termsOfService",
        description_key: "Legal.termsDescription",
    },
    LegalDocument {
        slug: "privacy",
        link_key: "Footer.privacy",
        title_key: "Legal.privacyPolicy",
        description_key: "Legal.privacyDescription",
    },
    LegalDocument {
        slug: "kvkk",
        link_key: "Footer.kvkk",
        title_key: "Legal.kvkk",
        description_key: "Legal.kvkkDescription",
    },
];

/// `GET /legal/{page}`.
pub(crate) async fn legal_page(
    State(state): State<Arc<ApiState>>,
    Path(page): Path<String>,
) -> Result<Json<LegalPage>, ApiError> {
    let locale = current_locale();
    let Some(document) = LEGAL_DOCUMENTS.iter().find(|document| document.slug == page) else {
        debug!(page = %page, "legal page not found");
        return Err(ApiError::not_found("Legal.notFound"));
    };
    let links = LEGAL_DOCUMENTS
        .iter()
        .map(|document| LegalLink {
            href: state.base_path.join(&format!("/legal/{}", document.slug)),
            label: state.text(locale, document.link_key),
        })
        .collect();
    let title = state.text(locale, document.title_key);
    state.page_rendered("legal", locale);
    Ok(Json(LegalPage {
        context: locale.into(),
        page: document.slug.to_string(),
        document_title: format!("{title} - {SITE_NAME}"),
        description: state.text(locale, document.description_key),
        title,
        links,
    }))
}
