//! Rows exposed by the backend's public views.
//!
//! Bilingual fields come in `_en`/`_tr` pairs and any of them may be null.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One ingredient line, valid for its parent variant's serving count.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Ingredient name.
    pub name: String,
    /// Quantity for the variant's serving count.
    pub amount: f64,
    /// Unit of measure.
    pub unit: String,
    /// Optional preparation note.
    #[serde(default)]
    pub note: Option<String>,
}

/// One instruction step.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeStep {
    /// 1-based position.
    pub step_number: u32,
    /// Instruction text.
    pub text: String,
}

/// Pre-computed ingredient lists for one serving count.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecipeVariant {
    /// Serving count; unique within a recipe.
    pub servings: u32,
    /// Backend identifier.
    pub variant_id: i64,
    /// Optional variant-specific photo.
    #[serde(default)]
    pub variant_image_url: Option<String>,
    /// English ingredient list.
    #[serde(default)]
    pub ingredients_en: Option<Vec<Ingredient>>,
    /// Turkish ingredient list.
    #[serde(default)]
    pub ingredients_tr: Option<Vec<Ingredient>>,
}

/// Denormalised recipe detail row (`v_public_recipe_details`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecipeDetail {
    /// Recipe identifier.
    pub recipe_id: i64,
    /// Publication status.
    pub status: String,
    /// Whether the recipe is free to view.
    pub is_free: bool,
    /// Author identifier.
    #[serde(default)]
    pub user_id: Option<String>,
    /// Cover photo.
    #[serde(default)]
    pub cover_image_url: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// English title.
    #[serde(default)]
    pub title_en: Option<String>,
    /// Turkish title.
    #[serde(default)]
    pub title_tr: Option<String>,
    /// English description.
    #[serde(default)]
    pub description_en: Option<String>,
    /// Turkish description.
    #[serde(default)]
    pub description_tr: Option<String>,
    /// English tips.
    #[serde(default)]
    pub tips_en: Option<String>,
    /// Turkish tips.
    #[serde(default)]
    pub tips_tr: Option<String>,
    /// English SEO title.
    #[serde(default)]
    pub seo_title_en: Option<String>,
    /// Turkish SEO title.
    #[serde(default)]
    pub seo_title_tr: Option<String>,
    /// English SEO description.
    #[serde(default)]
    pub seo_description_en: Option<String>,
    /// Turkish SEO description.
    #[serde(default)]
    pub seo_description_tr: Option<String>,
    /// Category name keyed by locale code.
    #[serde(default)]
    pub category_names: Option<BTreeMap<String, String>>,
    /// Views.
    #[serde(default)]
    pub view_count: u64,
    /// Favorites.
    #[serde(default)]
    pub favorite_count: u64,
    /// Saves.
    #[serde(default)]
    pub save_count: u64,
    /// "I tried this" marks.
    #[serde(default)]
    pub tried_count: u64,
    /// Comments.
    #[serde(default)]
    pub comment_count: u64,
    /// English steps.
    #[serde(default)]
    pub steps_en_json: Option<Vec<RecipeStep>>,
    /// Turkish steps.
    #[serde(default)]
    pub steps_tr_json: Option<Vec<RecipeStep>>,
    /// Serving counts offered by the selector.
    #[serde(default)]
    pub available_servings: Option<Vec<u32>>,
    /// Ingredient variants, one per serving count.
    #[serde(default)]
    pub variants_with_ingredients: Option<Vec<RecipeVariant>>,
}

/// Listing row (`v_public_recipe_cards`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeCard {
    /// Recipe identifier.
    pub recipe_id: i64,
    /// English title.
    #[serde(default)]
    pub title_en: Option<String>,
    /// Turkish title.
    #[serde(default)]
    pub title_tr: Option<String>,
    /// English description.
    #[serde(default)]
    pub description_en: Option<String>,
    /// Turkish description.
    #[serde(default)]
    pub description_tr: Option<String>,
    /// Cover photo.
    #[serde(default)]
    pub cover_image_url: Option<String>,
    /// Primary category slug.
    #[serde(default)]
    pub category_slug: Option<String>,
    /// Views.
    #[serde(default)]
    pub view_count: u64,
    /// Favorites.
    #[serde(default)]
    pub favorite_count: u64,
    /// Comments.
    #[serde(default)]
    pub comment_count: u64,
    /// Creation timestamp; listings are newest first.
    pub created_at: DateTime<Utc>,
}

/// Slug and image of a category, embedded in translation rows.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRef {
    /// URL slug.
    pub slug: String,
    /// Category image.
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Category translation row for one locale (`category_translations`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryInfo {
    /// Category identifier.
    pub category_id: i64,
    /// Locale code of this translation.
    pub locale: String,
    /// Localised name.
    pub name: String,
    /// Localised description.
    #[serde(default)]
    pub description: Option<String>,
    /// Locale-independent category fields.
    pub categories: CategoryRef,
}

/// Favorite row from the user's library (`v_user_library`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteRecipe {
    /// Recipe identifier.
    pub recipe_id: i64,
    /// English title.
    #[serde(default)]
    pub title_en: Option<String>,
    /// Turkish title.
    #[serde(default)]
    pub title_tr: Option<String>,
    /// English description.
    #[serde(default)]
    pub description_en: Option<String>,
    /// Turkish description.
    #[serde(default)]
    pub description_tr: Option<String>,
    /// Cover photo.
    #[serde(default)]
    pub cover_image_url: Option<String>,
    /// Primary category slug.
    #[serde(default)]
    pub category_slug: Option<String>,
}

/// Listing filters understood by [`crate::RecipeSource::public_recipes`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeFilters {
    /// Category slug to restrict to.
    #[serde(default)]
    pub category: Option<String>,
    /// Case-insensitive title search across both languages.
    #[serde(default)]
    pub search: Option<String>,
    /// Maximum rows.
    #[serde(default)]
    pub limit: Option<u32>,
    /// Rows to skip.
    #[serde(default)]
    pub offset: Option<u32>,
}

impl RecipeFilters {
    /// Trimmed search term, `None` when blank.
    #[must_use]
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
    }

    /// Trimmed category slug, `None` when blank.
    #[must_use]
    pub fn category_slug(&self) -> Option<&str> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|slug| !slug.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_row_tolerates_nulls() -> Result<(), serde_json::Error> {
        let raw = r#"{
            "recipe_id": 9,
            "status": "published",
            "is_free": true,
            "created_at": "2025-03-12T10:00:00Z",
            "updated_at": "2025-03-14T10:00:00Z",
            "title_en": null,
            "title_tr": "Mercimek Çorbası",
            "category_names": {"tr": "Çorbalar"},
            "steps_en_json": null,
            "variants_with_ingredients": [
                {"servings": 2, "variant_id": 1, "ingredients_en": null,
                 "ingredients_tr": [{"name": "Mercimek", "amount": 1.5, "unit": "su bardağı", "note": null}]}
            ]
        }"#;
        let detail: RecipeDetail = serde_json::from_str(raw)?;
        assert_eq!(detail.title_en, None);
        assert_eq!(detail.view_count, 0);
        assert_eq!(detail.available_servings, None);
        let variants = detail.variants_with_ingredients.unwrap_or_default();
        assert_eq!(variants.len(), 1);
        assert_eq!(variants[0].ingredients_en, None);
        Ok(())
    }

    #[test]
    fn filters_ignore_blank_values() {
        let filters = RecipeFilters {
            category: Some("  ".to_string()),
            search: Some(" soup ".to_string()),
            ..RecipeFilters::default()
        };
        assert_eq!(filters.category_slug(), None);
        assert_eq!(filters.search_term(), Some("soup"));
    }
}
