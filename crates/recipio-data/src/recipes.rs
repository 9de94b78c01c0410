//! [`RecipeSource`] over the backend's public views.

use async_trait::async_trait;
use recipio_i18n::Locale;
use recipio_recipes::{
    CategoryInfo, RecipeCard, RecipeDetail, RecipeFilters, RecipeResult, RecipeSource,
};
use url::Url;

use crate::client::SupabaseClient;
use crate::error::Result;

const RECIPE_DETAILS: &str = "v_public_recipe_details";
const RECIPE_CARDS: &str = "v_public_recipe_cards";
const CATEGORY_TRANSLATIONS: &str = "category_translations";
const CATEGORY_COLUMNS: &str = "category_id,locale,name,description,categories(slug,image_url)";
const CATEGORY_COLUMNS_BY_SLUG: &str =
    "category_id,locale,name,description,categories!inner(slug,image_url)";

impl SupabaseClient {
    async fn fetch_recipe_detail(&self, recipe_id: i64) -> Result<Option<RecipeDetail>> {
        const OPERATION: &str = "recipe_detail";
        let mut url = self.rest_url(OPERATION, RECIPE_DETAILS)?;
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("recipe_id", &format!("eq.{recipe_id}"))
            .append_pair("limit", "1");
        let rows: Vec<RecipeDetail> = self
            .fetch_json(OPERATION, self.authorize(self.http.get(url), None))
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn fetch_public_recipes(&self, filters: &RecipeFilters) -> Result<Vec<RecipeCard>> {
        const OPERATION: &str = "public_recipes";
        let mut url = self.rest_url(OPERATION, RECIPE_CARDS)?;
        apply_card_filters(&mut url, filters);
        self.fetch_json(OPERATION, self.authorize(self.http.get(url), None))
            .await
    }

    async fn fetch_categories(&self, locale: Locale) -> Result<Vec<CategoryInfo>> {
        const OPERATION: &str = "categories";
        let mut url = self.rest_url(OPERATION, CATEGORY_TRANSLATIONS)?;
        url.query_pairs_mut()
            .append_pair("select", CATEGORY_COLUMNS)
            .append_pair("locale", &format!("eq.{}", locale.code()))
            .append_pair("order", "name.asc");
        self.fetch_json(OPERATION, self.authorize(self.http.get(url), None))
            .await
    }

    async fn fetch_category_by_slug(
        &self,
        slug: &str,
        locale: Locale,
    ) -> Result<Option<CategoryInfo>> {
        const OPERATION: &str = "category_by_slug";
        let mut url = self.rest_url(OPERATION, CATEGORY_TRANSLATIONS)?;
        url.query_pairs_mut()
            .append_pair("select", CATEGORY_COLUMNS_BY_SLUG)
            .append_pair("locale", &format!("eq.{}", locale.code()))
            .append_pair("categories.slug", &format!("eq.{slug}"))
            .append_pair("limit", "1");
        let rows: Vec<CategoryInfo> = self
            .fetch_json(OPERATION, self.authorize(self.http.get(url), None))
            .await?;
        Ok(rows.into_iter().next())
    }
}

fn apply_card_filters(url: &mut Url, filters: &RecipeFilters) {
    let mut pairs = url.query_pairs_mut();
    pairs
        .append_pair("select", "*")
        .append_pair("order", "created_at.desc");
    if let Some(slug) = filters.category_slug() {
        pairs.append_pair("category_slug", &format!("eq.{slug}"));
    }
    if let Some(term) = filters.search_term().map(sanitize_search).filter(|term| !term.is_empty()) {
        pairs.append_pair(
            "or",
            &format!("(title_en.ilike.*{term}*,title_tr.ilike.*{term}*)"),
        );
    }
    if let Some(limit) = filters.limit {
        pairs.append_pair("limit", &limit.to_string());
    }
    if let Some(offset) = filters.offset {
        pairs.append_pair("offset", &offset.to_string());
    }
}

/// Drop characters that carry meaning inside a filter expression.
fn sanitize_search(term: &str) -> String {
    term.chars()
        .filter(|ch| !matches!(ch, ',' | '(' | ')' | '*' | '%' | '"' | '\\' | ':'))
        .collect::<String>()
        .trim()
        .to_string()
}

#[async_trait]
impl RecipeSource for SupabaseClient {
    async fn recipe_detail(&self, recipe_id: i64) -> RecipeResult<Option<RecipeDetail>> {
        Ok(self.fetch_recipe_detail(recipe_id).await?)
    }

    async fn public_recipes(&self, filters: &RecipeFilters) -> RecipeResult<Vec<RecipeCard>> {
        Ok(self.fetch_public_recipes(filters).await?)
    }

    async fn categories(&self, locale: Locale) -> RecipeResult<Vec<CategoryInfo>> {
        Ok(self.fetch_categories(locale).await?)
    }

    async fn category_by_slug(
        &self,
        slug: &str,
        locale: Locale,
    ) -> RecipeResult<Option<CategoryInfo>> {
        Ok(self.fetch_category_by_slug(slug, locale).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::test_client;
    use httpmock::prelude::*;
    use recipio_recipes::RecipeError;
    use recipio_test_support::fixtures;
    use serde_json::json;

    #[tokio::test]
    async fn recipe_detail_returns_first_row() -> RecipeResult<()> {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/rest/v1/v_public_recipe_details")
                    .query_param("recipe_id", "eq.1")
                    .header("apikey", "anon-key")
                    .header("authorization", "Bearer anon-key");
                then.status(200).json_body(json!([fixtures::lentil_soup_json()]));
            })
            .await;

        let client = test_client(&server.base_url());
        let detail = client.recipe_detail(1).await?;
        mock.assert_async().await;
        assert_eq!(detail.map(|recipe| recipe.recipe_id), Some(1));
        Ok(())
    }

    #[tokio::test]
    async fn recipe_detail_is_none_for_empty_result() -> RecipeResult<()> {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/rest/v1/v_public_recipe_details");
                then.status(200).json_body(json!([]));
            })
            .await;

        let client = test_client(&server.base_url());
        assert!(client.recipe_detail(404).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn public_recipes_send_filters() -> RecipeResult<()> {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/rest/v1/v_public_recipe_cards")
                    .query_param("order", "created_at.desc")
                    .query_param("category_slug", "eq.soups")
                    .query_param("or", "(title_en.ilike.*lentil*,title_tr.ilike.*lentil*)")
                    .query_param("limit", "6")
                    .query_param("offset", "12");
                then.status(200)
                    .json_body(json!([fixtures::recipe_card_json(3, "Lentil Soup", "Mercimek Çorbası")]));
            })
            .await;

        let filters = RecipeFilters {
            category: Some("soups".to_string()),
            search: Some(" lentil) ".to_string()),
            limit: Some(6),
            offset: Some(12),
        };
        let client = test_client(&server.base_url());
        let cards = client.public_recipes(&filters).await?;
        mock.assert_async().await;
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].title_tr.as_deref(), Some("Mercimek Çorbası"));
        Ok(())
    }

    #[tokio::test]
    async fn categories_are_requested_for_locale() -> RecipeResult<()> {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/rest/v1/category_translations")
                    .query_param("locale", "eq.en")
                    .query_param("select", CATEGORY_COLUMNS);
                then.status(200).json_body(json!([{
                    "category_id": 2,
                    "locale": "en",
                    "name": "Soups",
                    "description": null,
                    "categories": {"slug": "soups", "image_url": null}
                }]));
            })
            .await;

        let client = test_client(&server.base_url());
        let categories = client.categories(Locale::En).await?;
        mock.assert_async().await;
        assert_eq!(categories[0].categories.slug, "soups");
        Ok(())
    }

    #[tokio::test]
    async fn category_by_slug_filters_embedded_slug() -> RecipeResult<()> {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/rest/v1/category_translations")
                    .query_param("categories.slug", "eq.desserts")
                    .query_param("locale", "eq.tr");
                then.status(200).json_body(json!([]));
            })
            .await;

        let client = test_client(&server.base_url());
        assert!(client.category_by_slug("desserts", Locale::Tr).await?.is_none());
        mock.assert_async().await;
        Ok(())
    }

    #[tokio::test]
    async fn server_errors_surface_as_backend_failures() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/rest/v1/v_public_recipe_cards");
                then.status(503).body("maintenance");
            })
            .await;

        let client = test_client(&server.base_url());
        let result = client.public_recipes(&RecipeFilters::default()).await;
        assert!(matches!(
            result,
            Err(RecipeError::Backend {
                operation: "public_recipes",
                ..
            })
        ));
        assert_eq!(client.metrics().snapshot().backend_failures_total, 1);
    }

    #[tokio::test]
    async fn malformed_rows_are_decode_failures() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/rest/v1/v_public_recipe_details");
                then.status(200).json_body(json!({"unexpected": true}));
            })
            .await;

        let client = test_client(&server.base_url());
        let result = client.recipe_detail(1).await;
        assert!(matches!(result, Err(RecipeError::Backend { .. })));
    }

    #[test]
    fn search_terms_lose_filter_syntax() {
        assert_eq!(sanitize_search("  a,b(c)*d%\"e\\f:g "), "abcdefg");
        assert_eq!(sanitize_search("mercimek çorbası"), "mercimek çorbası");
    }
}
