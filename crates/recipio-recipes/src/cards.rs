//! Listing projections: recipe cards, category cards, and favorites.

use recipio_i18n::Locale;
use serde::Serialize;

use crate::localize::pick_text;
use crate::model::{CategoryInfo, FavoriteRecipe, RecipeCard};

/// A recipe card or favorite rendered in one language.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LocalizedCard {
    /// Recipe identifier.
    pub recipe_id: i64,
    /// Title; empty when neither language has one.
    pub title: String,
    /// Description, if either language has one.
    pub description: Option<String>,
    /// Cover photo.
    pub cover_image_url: Option<String>,
    /// Primary category slug.
    pub category_slug: Option<String>,
    /// Site-relative link to the detail page.
    pub href: String,
    /// Views.
    pub view_count: u64,
    /// Favorites.
    pub favorite_count: u64,
    /// Comments.
    pub comment_count: u64,
}

/// UI-ready category card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CategoryCard {
    /// Category identifier.
    pub id: i64,
    /// Localised name.
    pub name: String,
    /// Localised description.
    pub description: Option<String>,
    /// URL slug.
    pub slug: String,
    /// Category image.
    pub image_url: Option<String>,
    /// Site-relative link to the category page.
    pub href: String,
}

/// Project a listing row into `locale`.
#[must_use]
pub fn localize_card(card: &RecipeCard, locale: Locale) -> LocalizedCard {
    LocalizedCard {
        recipe_id: card.recipe_id,
        title: pick_text(locale, card.title_en.as_deref(), card.title_tr.as_deref())
            .unwrap_or_default(),
        description: pick_text(
            locale,
            card.description_en.as_deref(),
            card.description_tr.as_deref(),
        ),
        cover_image_url: card.cover_image_url.clone(),
        category_slug: card.category_slug.clone(),
        href: recipe_href(card.recipe_id),
        view_count: card.view_count,
        favorite_count: card.favorite_count,
        comment_count: card.comment_count,
    }
}

/// Project a library row into `locale`. Library rows carry no counters.
#[must_use]
pub fn localize_favorite(favorite: &FavoriteRecipe, locale: Locale) -> LocalizedCard {
    LocalizedCard {
        recipe_id: favorite.recipe_id,
        title: pick_text(
            locale,
            favorite.title_en.as_deref(),
            favorite.title_tr.as_deref(),
        )
        .unwrap_or_default(),
        description: pick_text(
            locale,
            favorite.description_en.as_deref(),
            favorite.description_tr.as_deref(),
        ),
        cover_image_url: favorite.cover_image_url.clone(),
        category_slug: favorite.category_slug.clone(),
        href: recipe_href(favorite.recipe_id),
        view_count: 0,
        favorite_count: 0,
        comment_count: 0,
    }
}

/// Card data for a category translation row.
#[must_use]
pub fn category_card(category: &CategoryInfo) -> CategoryCard {
    CategoryCard {
        id: category.category_id,
        name: category.name.clone(),
        description: category.description.clone(),
        slug: category.categories.slug.clone(),
        image_url: category.categories.image_url.clone(),
        href: format!("/categories/{}", category.categories.slug),
    }
}

fn recipe_href(recipe_id: i64) -> String {
    format!("/recipes/{recipe_id}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CategoryRef;
    use chrono::Utc;

    fn card() -> RecipeCard {
        RecipeCard {
            recipe_id: 7,
            title_en: Some("Brownies".to_string()),
            title_tr: None,
            description_en: None,
            description_tr: Some("Islak kek".to_string()),
            cover_image_url: None,
            category_slug: Some("desserts".to_string()),
            view_count: 10,
            favorite_count: 2,
            comment_count: 1,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn card_fields_fall_back_independently() {
        let localized = localize_card(&card(), Locale::Tr);
        assert_eq!(localized.title, "Brownies");
        assert_eq!(localized.description.as_deref(), Some("Islak kek"));
        assert_eq!(localized.href, "/recipes/7");
        assert_eq!(localized.view_count, 10);
    }

    #[test]
    fn favorite_without_titles_renders_empty_title() {
        let favorite = FavoriteRecipe {
            recipe_id: 3,
            title_en: None,
            title_tr: None,
            description_en: None,
            description_tr: None,
            cover_image_url: None,
            category_slug: None,
        };
        let localized = localize_favorite(&favorite, Locale::En);
        assert_eq!(localized.title, "");
        assert_eq!(localized.href, "/recipes/3");
    }

    #[test]
    fn category_card_links_by_slug() {
        let info = CategoryInfo {
            category_id: 4,
            locale: "tr".to_string(),
            name: "Çorbalar".to_string(),
            description: None,
            categories: CategoryRef {
                slug: "soups".to_string(),
                image_url: Some("https://img.example/soups.jpg".to_string()),
            },
        };
        let card = category_card(&info);
        assert_eq!(card.href, "/categories/soups");
        assert_eq!(card.name, "Çorbalar");
        assert_eq!(card.id, 4);
    }
}
