//! Projection of a bilingual recipe row into one language.
//!
//! # Design
//! - Every translatable attribute follows [`Locale::fallback_chain`]: the
//!   requested locale first, then the other one, then absent.
//! - Blank strings and empty lists count as absent so a missing translation
//!   never hides the one that exists.
//! - Ingredient lists fall back as a whole; lines are never mixed across languages.
//! - Serving counts are matched exactly; amounts are never rescaled.

use chrono::{DateTime, Datelike, Utc};
use recipio_i18n::Locale;
use serde::Serialize;

use crate::model::{Ingredient, RecipeDetail, RecipeStep};

/// Serving counts offered when a recipe does not list its own.
pub const DEFAULT_SERVINGS: [u32; 4] = [1, 2, 3, 4];

/// Suffix of every document title.
pub const SITE_NAME: &str = "Recipio";

/// A recipe with exactly one language's worth of display strings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LocalizedRecipe {
    /// Recipe identifier.
    pub recipe_id: i64,
    /// Locale the strings were resolved for.
    pub locale: Locale,
    /// Title, if either language has one.
    pub title: Option<String>,
    /// Description, if either language has one.
    pub description: Option<String>,
    /// Chef's tips, if either language has them.
    pub tips: Option<String>,
    /// SEO title override.
    pub seo_title: Option<String>,
    /// SEO description override.
    pub seo_description: Option<String>,
    /// Instruction steps; empty when neither language has any.
    pub steps: Vec<RecipeStep>,
    /// Primary category name.
    pub category_name: Option<String>,
}

/// Head metadata for a recipe page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PageMetadata {
    /// Document title.
    pub title: String,
    /// Meta description.
    pub description: Option<String>,
    /// Open Graph title.
    pub og_title: String,
    /// Open Graph image.
    pub og_image: Option<String>,
}

/// Resolve every translatable field of `recipe` for `locale`.
#[must_use]
pub fn localize(recipe: &RecipeDetail, locale: Locale) -> LocalizedRecipe {
    LocalizedRecipe {
        recipe_id: recipe.recipe_id,
        locale,
        title: pick_text(locale, recipe.title_en.as_deref(), recipe.title_tr.as_deref()),
        description: pick_text(
            locale,
            recipe.description_en.as_deref(),
            recipe.description_tr.as_deref(),
        ),
        tips: pick_text(locale, recipe.tips_en.as_deref(), recipe.tips_tr.as_deref()),
        seo_title: pick_text(
            locale,
            recipe.seo_title_en.as_deref(),
            recipe.seo_title_tr.as_deref(),
        ),
        seo_description: pick_text(
            locale,
            recipe.seo_description_en.as_deref(),
            recipe.seo_description_tr.as_deref(),
        ),
        steps: pick_list(
            locale,
            recipe.steps_en_json.as_deref(),
            recipe.steps_tr_json.as_deref(),
        )
        .to_vec(),
        category_name: category_name(recipe, locale),
    }
}

/// Ingredient list for an exact serving count; empty when no variant matches.
#[must_use]
pub fn ingredients_for_servings(
    recipe: &RecipeDetail,
    servings: u32,
    locale: Locale,
) -> &[Ingredient] {
    recipe
        .variants_with_ingredients
        .as_deref()
        .unwrap_or_default()
        .iter()
        .find(|variant| variant.servings == servings)
        .map(|variant| {
            pick_list(
                locale,
                variant.ingredients_en.as_deref(),
                variant.ingredients_tr.as_deref(),
            )
        })
        .unwrap_or_default()
}

/// Serving counts for the selector.
#[must_use]
pub fn available_servings(recipe: &RecipeDetail) -> Vec<u32> {
    match recipe.available_servings.as_deref() {
        Some(list) if !list.is_empty() => list.to_vec(),
        _ => DEFAULT_SERVINGS.to_vec(),
    }
}

/// Initially selected serving count: the first available one.
#[must_use]
pub fn default_servings(recipe: &RecipeDetail) -> u32 {
    available_servings(recipe).first().copied().unwrap_or(1)
}

/// `requested` when the selector offers it, otherwise [`default_servings`].
#[must_use]
pub fn select_servings(recipe: &RecipeDetail, requested: Option<u32>) -> u32 {
    requested
        .filter(|servings| available_servings(recipe).contains(servings))
        .unwrap_or_else(|| default_servings(recipe))
}

/// Document title: the SEO title, else `"<title> - Recipio"`.
#[must_use]
pub fn page_title(view: &LocalizedRecipe) -> String {
    view.seo_title.clone().unwrap_or_else(|| {
        format!(
            "{} - {SITE_NAME}",
            view.title.as_deref().unwrap_or("Recipe")
        )
    })
}

/// Head metadata for a found recipe.
#[must_use]
pub fn page_metadata(recipe: &RecipeDetail, view: &LocalizedRecipe) -> PageMetadata {
    PageMetadata {
        title: page_title(view),
        description: view
            .seo_description
            .clone()
            .or_else(|| view.description.clone()),
        og_title: view.title.clone().unwrap_or_else(|| "Recipe".to_string()),
        og_image: recipe.cover_image_url.clone(),
    }
}

/// Head metadata when the recipe does not exist.
#[must_use]
pub fn not_found_metadata() -> PageMetadata {
    let title = format!("Recipe Not Found - {SITE_NAME}");
    PageMetadata {
        og_title: title.clone(),
        title,
        description: None,
        og_image: None,
    }
}

const MONTHS_EN: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const MONTHS_TR: [&str; 12] = [
    "Ocak", "Şubat", "Mart", "Nisan", "Mayıs", "Haziran", "Temmuz", "Ağustos", "Eylül", "Ekim",
    "Kasım", "Aralık",
];

/// Long-form date in the locale's conventions (`12 Mart 2025`, `March 12, 2025`).
#[must_use]
pub fn format_date(date: DateTime<Utc>, locale: Locale) -> String {
    let month = date.month0() as usize;
    match locale {
        Locale::Tr => format!("{} {} {}", date.day(), MONTHS_TR[month], date.year()),
        Locale::En => format!("{} {}, {}", MONTHS_EN[month], date.day(), date.year()),
    }
}

fn category_name(recipe: &RecipeDetail, locale: Locale) -> Option<String> {
    let names = recipe.category_names.as_ref()?;
    locale
        .fallback_chain()
        .into_iter()
        .find_map(|candidate| {
            names
                .get(candidate.code())
                .map(String::as_str)
                .filter(|name| !name.trim().is_empty())
        })
        .map(ToString::to_string)
}

pub(crate) fn pick_text(locale: Locale, en: Option<&str>, tr: Option<&str>) -> Option<String> {
    locale
        .fallback_chain()
        .into_iter()
        .find_map(|candidate| {
            let value = match candidate {
                Locale::En => en,
                Locale::Tr => tr,
            };
            value.filter(|text| !text.trim().is_empty())
        })
        .map(ToString::to_string)
}

fn pick_list<'a, T>(locale: Locale, en: Option<&'a [T]>, tr: Option<&'a [T]>) -> &'a [T] {
    locale
        .fallback_chain()
        .into_iter()
        .find_map(|candidate| {
            let value = match candidate {
                Locale::En => en,
                Locale::Tr => tr,
            };
            value.filter(|list| !list.is_empty())
        })
        .unwrap_or_default()
}
