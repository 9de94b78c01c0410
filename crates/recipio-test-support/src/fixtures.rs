//! Sample backend rows.
//!
//! The lentil soup is fully bilingual with two serving variants; the pilaf
//! only carries English content so fallback paths have something to chew on.

use std::collections::BTreeMap;

use chrono::{DateTime, TimeZone, Utc};
use recipio_i18n::Locale;
use recipio_recipes::{
    CategoryInfo, CategoryRef, FavoriteRecipe, Ingredient, RecipeCard, RecipeDetail, RecipeStep,
    RecipeVariant, Session, UserProfile,
};
use serde_json::Value;

/// Identifier of [`lentil_soup`].
pub const LENTIL_SOUP_ID: i64 = 1;
/// Identifier of [`english_only_pilaf`].
pub const PILAF_ID: i64 = 2;
/// Email of [`user`].
pub const USER_EMAIL: &str = "ayse@example.com";
/// Password accepted for [`user`] by the in-memory account backend.
pub const USER_PASSWORD: &str = "mercimek";
/// Access token of [`session`].
pub const ACCESS_TOKEN: &str = "token-ayse";

/// `2025-03-12T10:00:00Z` plus `days`.
#[must_use]
pub fn timestamp(days: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 12, 10, 0, 0)
        .single()
        .unwrap_or_default()
        + chrono::Duration::days(days)
}

/// Ingredient line without a note.
#[must_use]
pub fn ingredient(name: &str, amount: f64, unit: &str) -> Ingredient {
    Ingredient {
        name: name.to_string(),
        amount,
        unit: unit.to_string(),
        note: None,
    }
}

fn steps(texts: &[&str]) -> Vec<RecipeStep> {
    texts
        .iter()
        .zip(1..)
        .map(|(text, step_number)| RecipeStep {
            step_number,
            text: (*text).to_string(),
        })
        .collect()
}

fn text(value: &str) -> Option<String> {
    Some(value.to_string())
}

/// Bilingual lentil soup offered for 2 and 4 servings.
#[must_use]
pub fn lentil_soup() -> RecipeDetail {
    RecipeDetail {
        recipe_id: LENTIL_SOUP_ID,
        status: "published".to_string(),
        is_free: true,
        user_id: text("author-1"),
        cover_image_url: text("https://cdn.example.com/lentil.jpg"),
        created_at: timestamp(0),
        updated_at: timestamp(2),
        title_en: text("Lentil Soup"),
        title_tr: text("Mercimek Çorbası"),
        description_en: text("A classic red lentil soup."),
        description_tr: text("Klasik kırmızı mercimek çorbası."),
        tips_en: text("Finish with lemon."),
        tips_tr: text("Limonla servis edin."),
        seo_title_en: None,
        seo_title_tr: text("Mercimek Çorbası Tarifi"),
        seo_description_en: None,
        seo_description_tr: None,
        category_names: Some(BTreeMap::from([
            ("en".to_string(), "Soups".to_string()),
            ("tr".to_string(), "Çorbalar".to_string()),
        ])),
        view_count: 120,
        favorite_count: 14,
        save_count: 9,
        tried_count: 5,
        comment_count: 3,
        steps_en_json: Some(steps(&["Rinse the lentils.", "Simmer for 25 minutes."])),
        steps_tr_json: Some(steps(&["Mercimeği yıkayın.", "25 dakika pişirin."])),
        available_servings: Some(vec![2, 4]),
        variants_with_ingredients: Some(vec![
            RecipeVariant {
                servings: 2,
                variant_id: 11,
                variant_image_url: None,
                ingredients_en: Some(vec![
                    ingredient("Red lentils", 1.0, "cup"),
                    ingredient("Onion", 1.0, "piece"),
                ]),
                ingredients_tr: Some(vec![
                    ingredient("Kırmızı mercimek", 1.0, "su bardağı"),
                    ingredient("Soğan", 1.0, "adet"),
                ]),
            },
            RecipeVariant {
                servings: 4,
                variant_id: 12,
                variant_image_url: None,
                ingredients_en: Some(vec![
                    ingredient("Red lentils", 2.0, "cup"),
                    ingredient("Onion", 1.5, "piece"),
                ]),
                ingredients_tr: Some(vec![
                    ingredient("Kırmızı mercimek", 2.0, "su bardağı"),
                    ingredient("Soğan", 1.5, "adet"),
                ]),
            },
        ]),
    }
}

/// Pilaf with English content only and no serving list.
#[must_use]
pub fn english_only_pilaf() -> RecipeDetail {
    RecipeDetail {
        recipe_id: PILAF_ID,
        status: "published".to_string(),
        is_free: true,
        user_id: None,
        cover_image_url: None,
        created_at: timestamp(5),
        updated_at: timestamp(5),
        title_en: text("Rice Pilaf"),
        title_tr: None,
        description_en: text("Buttery rice pilaf."),
        description_tr: None,
        tips_en: None,
        tips_tr: None,
        seo_title_en: None,
        seo_title_tr: None,
        seo_description_en: None,
        seo_description_tr: None,
        category_names: Some(BTreeMap::from([("en".to_string(), "Mains".to_string())])),
        view_count: 0,
        favorite_count: 0,
        save_count: 0,
        tried_count: 0,
        comment_count: 0,
        steps_en_json: Some(steps(&["Toast the rice in butter."])),
        steps_tr_json: None,
        available_servings: None,
        variants_with_ingredients: Some(vec![RecipeVariant {
            servings: 4,
            variant_id: 21,
            variant_image_url: None,
            ingredients_en: Some(vec![ingredient("Rice", 2.0, "cup")]),
            ingredients_tr: None,
        }]),
    }
}

/// [`lentil_soup`] as the backend would serialise it.
#[must_use]
pub fn lentil_soup_json() -> Value {
    serde_json::to_value(lentil_soup()).unwrap_or_default()
}

/// Listing card.
#[must_use]
pub fn recipe_card(recipe_id: i64, title_en: &str, title_tr: &str) -> RecipeCard {
    RecipeCard {
        recipe_id,
        title_en: Some(title_en.to_string()).filter(|title| !title.is_empty()),
        title_tr: Some(title_tr.to_string()).filter(|title| !title.is_empty()),
        description_en: None,
        description_tr: None,
        cover_image_url: None,
        category_slug: Some("soups".to_string()),
        view_count: 0,
        favorite_count: 0,
        comment_count: 0,
        created_at: timestamp(recipe_id),
    }
}

/// [`recipe_card`] as JSON.
#[must_use]
pub fn recipe_card_json(recipe_id: i64, title_en: &str, title_tr: &str) -> Value {
    serde_json::to_value(recipe_card(recipe_id, title_en, title_tr)).unwrap_or_default()
}

/// Cards for the two sample recipes, newest first.
#[must_use]
pub fn recipe_cards() -> Vec<RecipeCard> {
    let soup = lentil_soup();
    let pilaf = english_only_pilaf();
    vec![
        RecipeCard {
            recipe_id: pilaf.recipe_id,
            title_en: pilaf.title_en,
            title_tr: pilaf.title_tr,
            description_en: pilaf.description_en,
            description_tr: pilaf.description_tr,
            cover_image_url: pilaf.cover_image_url,
            category_slug: Some("mains".to_string()),
            view_count: pilaf.view_count,
            favorite_count: pilaf.favorite_count,
            comment_count: pilaf.comment_count,
            created_at: pilaf.created_at,
        },
        RecipeCard {
            recipe_id: soup.recipe_id,
            title_en: soup.title_en,
            title_tr: soup.title_tr,
            description_en: soup.description_en,
            description_tr: soup.description_tr,
            cover_image_url: soup.cover_image_url,
            category_slug: Some("soups".to_string()),
            view_count: soup.view_count,
            favorite_count: soup.favorite_count,
            comment_count: soup.comment_count,
            created_at: soup.created_at,
        },
    ]
}

/// Category translations for both sample categories in `locale`.
#[must_use]
pub fn categories(locale: Locale) -> Vec<CategoryInfo> {
    let rows: [(i64, &str, &str, &str); 2] = match locale {
        Locale::Tr => [
            (1, "soups", "Çorbalar", "Sıcak çorbalar"),
            (2, "mains", "Ana Yemekler", "Doyurucu tabaklar"),
        ],
        Locale::En => [
            (1, "soups", "Soups", "Warming soups"),
            (2, "mains", "Mains", "Hearty plates"),
        ],
    };
    rows.into_iter()
        .map(|(category_id, slug, name, description)| CategoryInfo {
            category_id,
            locale: locale.code().to_string(),
            name: name.to_string(),
            description: Some(description.to_string()),
            categories: CategoryRef {
                slug: slug.to_string(),
                image_url: None,
            },
        })
        .collect()
}

/// Signed-in sample user.
#[must_use]
pub fn user() -> UserProfile {
    UserProfile {
        id: "user-ayse".to_string(),
        email: Some(USER_EMAIL.to_string()),
        full_name: Some("Ayşe Yılmaz".to_string()),
        display_name: Some("ayse".to_string()),
    }
}

/// Session for [`user`].
#[must_use]
pub fn session() -> Session {
    Session {
        access_token: ACCESS_TOKEN.to_string(),
        user: user(),
    }
}

/// Library row for a sample recipe.
#[must_use]
pub fn favorite(recipe: &RecipeDetail) -> FavoriteRecipe {
    FavoriteRecipe {
        recipe_id: recipe.recipe_id,
        title_en: recipe.title_en.clone(),
        title_tr: recipe.title_tr.clone(),
        description_en: recipe.description_en.clone(),
        description_tr: recipe.description_tr.clone(),
        cover_image_url: recipe.cover_image_url.clone(),
        category_slug: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lentil_soup_round_trips_through_json() -> Result<(), serde_json::Error> {
        let parsed: RecipeDetail = serde_json::from_value(lentil_soup_json())?;
        assert_eq!(parsed, lentil_soup());
        Ok(())
    }

    #[test]
    fn cards_are_newest_first() {
        let cards = recipe_cards();
        assert!(cards[0].created_at > cards[1].created_at);
    }
}
