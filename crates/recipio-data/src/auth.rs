//! [`AccountSource`] over the auth API and the user's recipe library.
//!
//! # Design
//! - Auth endpoints report bad credentials and unconfirmed emails as 400s;
//!   both map onto typed [`RecipeError`] variants instead of backend failures.
//! - Library rows are read and written with the user's own access token.

use async_trait::async_trait;
use recipio_recipes::{
    AccountSource, Credentials, FavoriteRecipe, RecipeError, RecipeResult, Registration, Session,
    SignUpOutcome, UserProfile,
};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::client::SupabaseClient;
use crate::error::Result;

const USER_LIBRARY: &str = "v_user_library";
const RECIPE_ENGAGEMENTS: &str = "recipe_engagements";
const FAVORITE: &str = "favorite";
const FAVORITE_COLUMNS: &str =
    "recipe_id,title_en,title_tr,description_en,description_tr,cover_image_url,category_slug";
const HEADER_PREFER: &str = "Prefer";
const UNCONFIRMED_MARKERS: [&str; 2] = ["email_not_confirmed", "Email not confirmed"];

#[derive(Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct CodeGrant<'a> {
    auth_code: &'a str,
}

#[derive(Serialize)]
struct SignUpRequest<'a> {
    email: &'a str,
    password: &'a str,
    data: SignUpMetadata<'a>,
}

#[derive(Serialize)]
struct SignUpMetadata<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    display_name: Option<&'a str>,
}

#[derive(Serialize)]
struct EngagementRow<'a> {
    user_id: &'a str,
    recipe_id: i64,
    engagement_type: &'static str,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    user: AuthUser,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SignUpResponse {
    Session(TokenResponse),
    Pending(AuthUser),
}

#[derive(Deserialize)]
struct AuthUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    user_metadata: Option<UserMetadata>,
}

#[derive(Default, Deserialize)]
struct UserMetadata {
    #[serde(default)]
    full_name: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
}

#[derive(Default, Deserialize)]
struct AuthErrorBody {
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl AuthErrorBody {
    fn parse(raw: &str) -> Self {
        serde_json::from_str(raw).unwrap_or_default()
    }

    fn reason(self) -> Option<String> {
        self.msg
            .or(self.error_description)
            .or(self.message)
            .map(|reason| reason.trim().to_string())
            .filter(|reason| !reason.is_empty())
    }
}

impl From<AuthUser> for UserProfile {
    fn from(user: AuthUser) -> Self {
        let metadata = user.user_metadata.unwrap_or_default();
        Self {
            id: user.id,
            email: user.email,
            full_name: metadata.full_name,
            display_name: metadata.display_name,
        }
    }
}

impl From<TokenResponse> for Session {
    fn from(token: TokenResponse) -> Self {
        Self {
            access_token: token.access_token,
            user: token.user.into(),
        }
    }
}

impl SupabaseClient {
    async fn password_grant(&self, credentials: &Credentials) -> RecipeResult<Session> {
        const OPERATION: &str = "sign_in";
        let mut url = self.auth_url(OPERATION, "token")?;
        url.query_pairs_mut().append_pair("grant_type", "password");
        let request = self.http.post(url).json(&PasswordGrant {
            email: &credentials.email,
            password: &credentials.password,
        });
        let response = self.send_raw(OPERATION, request).await?;
        match response.status() {
            status if status.is_success() => {
                let token: TokenResponse = self.decode(OPERATION, response).await?;
                info!(user_id = %token.user.id, "user signed in");
                Ok(token.into())
            }
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED => {
                let body = response.text().await.unwrap_or_default();
                if UNCONFIRMED_MARKERS.iter().any(|marker| body.contains(marker)) {
                    debug!("sign-in refused for unconfirmed email");
                    Err(RecipeError::EmailConfirmationRequired)
                } else {
                    debug!("sign-in refused");
                    Err(RecipeError::InvalidCredentials)
                }
            }
            _ => Err(self.status_error(OPERATION, response).await.into()),
        }
    }

    async fn code_grant(&self, code: &str) -> RecipeResult<Session> {
        const OPERATION: &str = "exchange_code";
        let mut url = self.auth_url(OPERATION, "token")?;
        url.query_pairs_mut().append_pair("grant_type", "pkce");
        let request = self.http.post(url).json(&CodeGrant { auth_code: code });
        let response = self.send_raw(OPERATION, request).await?;
        let status = response.status();
        if status.is_client_error() {
            let body = response.text().await.unwrap_or_default();
            let reason = AuthErrorBody::parse(&body)
                .reason()
                .unwrap_or_else(|| status.to_string());
            debug!(status = status.as_u16(), "auth code rejected");
            return Err(RecipeError::AuthCodeRejected { reason });
        }
        if !status.is_success() {
            return Err(self.status_error(OPERATION, response).await.into());
        }
        let token: TokenResponse = self.decode(OPERATION, response).await?;
        info!(user_id = %token.user.id, "sign-in link exchanged");
        Ok(token.into())
    }

    async fn register(&self, registration: &Registration) -> RecipeResult<SignUpOutcome> {
        const OPERATION: &str = "sign_up";
        let url = self.auth_url(OPERATION, "signup")?;
        let display_name = registration
            .display_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty());
        let request = self.http.post(url).json(&SignUpRequest {
            email: &registration.email,
            password: &registration.password,
            data: SignUpMetadata { display_name },
        });
        let response = self.send_raw(OPERATION, request).await?;
        let status = response.status();
        if status.is_client_error() {
            let body = response.text().await.unwrap_or_default();
            let reason = AuthErrorBody::parse(&body)
                .reason()
                .unwrap_or_else(|| status.to_string());
            debug!(status = status.as_u16(), "sign-up rejected");
            return Err(RecipeError::RegistrationRejected { reason });
        }
        if !status.is_success() {
            return Err(self.status_error(OPERATION, response).await.into());
        }
        match self.decode::<SignUpResponse>(OPERATION, response).await? {
            SignUpResponse::Session(token) => {
                info!(user_id = %token.user.id, "account created and signed in");
                Ok(SignUpOutcome::SignedIn(token.into()))
            }
            SignUpResponse::Pending(user) => {
                info!(user_id = %user.id, "account created, awaiting email confirmation");
                Ok(SignUpOutcome::ConfirmationRequired)
            }
        }
    }

    async fn revoke(&self, access_token: &str) -> Result<()> {
        const OPERATION: &str = "sign_out";
        let url = self.auth_url(OPERATION, "logout")?;
        let request = self.authorize(self.http.post(url), Some(access_token));
        let response = self.send_raw(OPERATION, request).await?;
        let status = response.status();
        if status.is_success() || status == StatusCode::UNAUTHORIZED {
            return Ok(());
        }
        Err(self.status_error(OPERATION, response).await)
    }

    async fn current_user(&self, access_token: &str) -> Result<Option<UserProfile>> {
        const OPERATION: &str = "session";
        let url = self.auth_url(OPERATION, "user")?;
        let request = self.authorize(self.http.get(url), Some(access_token));
        let response = self.send_raw(OPERATION, request).await?;
        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Ok(None),
            status if status.is_success() => {
                let user: AuthUser = self.decode(OPERATION, response).await?;
                Ok(Some(user.into()))
            }
            _ => Err(self.status_error(OPERATION, response).await),
        }
    }

    async fn library_favorites(&self, session: &Session) -> Result<Vec<FavoriteRecipe>> {
        const OPERATION: &str = "favorites";
        let mut url = self.rest_url(OPERATION, USER_LIBRARY)?;
        url.query_pairs_mut()
            .append_pair("select", FAVORITE_COLUMNS)
            .append_pair("user_id", &format!("eq.{}", session.user.id))
            .append_pair("engagement_type", &format!("eq.{FAVORITE}"))
            .append_pair("order", "engaged_at.desc");
        let request = self.authorize(self.http.get(url), Some(&session.access_token));
        self.fetch_json(OPERATION, request).await
    }

    async fn insert_favorite(&self, session: &Session, recipe_id: i64) -> Result<()> {
        const OPERATION: &str = "add_favorite";
        let url = self.rest_url(OPERATION, RECIPE_ENGAGEMENTS)?;
        let request = self
            .authorize(self.http.post(url), Some(&session.access_token))
            .header(HEADER_PREFER, "resolution=ignore-duplicates,return=minimal")
            .json(&EngagementRow {
                user_id: &session.user.id,
                recipe_id,
                engagement_type: FAVORITE,
            });
        let response = self.send_raw(OPERATION, request).await?;
        let status = response.status();
        if status.is_success() || status == StatusCode::CONFLICT {
            return Ok(());
        }
        Err(self.status_error(OPERATION, response).await)
    }

    async fn delete_favorite(&self, session: &Session, recipe_id: i64) -> Result<()> {
        const OPERATION: &str = "remove_favorite";
        let mut url = self.rest_url(OPERATION, RECIPE_ENGAGEMENTS)?;
        url.query_pairs_mut()
            .append_pair("user_id", &format!("eq.{}", session.user.id))
            .append_pair("recipe_id", &format!("eq.{recipe_id}"))
            .append_pair("engagement_type", &format!("eq.{FAVORITE}"));
        let request = self
            .authorize(self.http.delete(url), Some(&session.access_token))
            .header(HEADER_PREFER, "return=minimal");
        self.send(OPERATION, request).await.map(drop)
    }
}

#[async_trait]
impl AccountSource for SupabaseClient {
    async fn sign_in(&self, credentials: &Credentials) -> RecipeResult<Session> {
        self.password_grant(credentials).await
    }

    async fn exchange_code(&self, code: &str) -> RecipeResult<Session> {
        self.code_grant(code).await
    }

    async fn sign_up(&self, registration: &Registration) -> RecipeResult<SignUpOutcome> {
        self.register(registration).await
    }

    async fn sign_out(&self, access_token: &str) -> RecipeResult<()> {
        Ok(self.revoke(access_token).await?)
    }

    async fn session(&self, access_token: &str) -> RecipeResult<Option<UserProfile>> {
        Ok(self.current_user(access_token).await?)
    }

    async fn favorites(&self, session: &Session) -> RecipeResult<Vec<FavoriteRecipe>> {
        Ok(self.library_favorites(session).await?)
    }

    async fn add_favorite(&self, session: &Session, recipe_id: i64) -> RecipeResult<()> {
        Ok(self.insert_favorite(session, recipe_id).await?)
    }

    async fn remove_favorite(&self, session: &Session, recipe_id: i64) -> RecipeResult<()> {
        Ok(self.delete_favorite(session, recipe_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::test_client;
    use httpmock::prelude::*;
    use recipio_test_support::fixtures;
    use serde_json::json;

    fn credentials() -> Credentials {
        Credentials {
            email: "ayse@example.com".to_string(),
            password: "mercimek".to_string(),
        }
    }

    fn auth_user_json() -> serde_json::Value {
        json!({
            "id": "user-1",
            "email": "ayse@example.com",
            "user_metadata": {"full_name": "Ayşe Yılmaz", "display_name": "ayse"}
        })
    }

    #[tokio::test]
    async fn sign_in_returns_session() -> RecipeResult<()> {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/auth/v1/token")
                    .query_param("grant_type", "password")
                    .header("apikey", "anon-key")
                    .json_body(json!({"email": "ayse@example.com", "password": "mercimek"}));
                then.status(200)
                    .json_body(json!({"access_token": "jwt-1", "user": auth_user_json()}));
            })
            .await;

        let client = test_client(&server.base_url());
        let session = client.sign_in(&credentials()).await?;
        mock.assert_async().await;
        assert_eq!(session.access_token, "jwt-1");
        assert_eq!(session.user.full_name.as_deref(), Some("Ayşe Yılmaz"));
        Ok(())
    }

    #[tokio::test]
    async fn sign_in_distinguishes_unconfirmed_email() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/auth/v1/token");
                then.status(400).json_body(json!({
                    "error": "invalid_grant",
                    "error_description": "Email not confirmed"
                }));
            })
            .await;

        let client = test_client(&server.base_url());
        let result = client.sign_in(&credentials()).await;
        assert!(matches!(result, Err(RecipeError::EmailConfirmationRequired)));
        assert_eq!(client.metrics().snapshot().backend_failures_total, 0);
    }

    #[tokio::test]
    async fn sign_in_rejects_bad_credentials() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/auth/v1/token");
                then.status(400).json_body(json!({
                    "error": "invalid_grant",
                    "error_description": "Invalid login credentials"
                }));
            })
            .await;

        let client = test_client(&server.base_url());
        let result = client.sign_in(&credentials()).await;
        assert!(matches!(result, Err(RecipeError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn auth_code_exchange_returns_session() -> RecipeResult<()> {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/auth/v1/token")
                    .query_param("grant_type", "pkce")
                    .header("apikey", "anon-key")
                    .json_body(json!({"auth_code": "code-1"}));
                then.status(200)
                    .json_body(json!({"access_token": "jwt-3", "user": auth_user_json()}));
            })
            .await;

        let client = test_client(&server.base_url());
        let session = client.exchange_code("code-1").await?;
        mock.assert_async().await;
        assert_eq!(session.access_token, "jwt-3");
        assert_eq!(session.user.id, "user-1");
        Ok(())
    }

    #[tokio::test]
    async fn expired_auth_code_is_rejected_with_reason() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/auth/v1/token")
                    .query_param("grant_type", "pkce");
                then.status(403).json_body(json!({
                    "error": "invalid_grant",
                    "error_description": "Code has expired or is invalid"
                }));
            })
            .await;

        let client = test_client(&server.base_url());
        let result = client.exchange_code("stale").await;
        assert!(matches!(
            result,
            Err(RecipeError::AuthCodeRejected { reason }) if reason == "Code has expired or is invalid"
        ));
        assert_eq!(client.metrics().snapshot().backend_failures_total, 0);
    }

    #[tokio::test]
    async fn sign_up_reports_pending_confirmation() -> RecipeResult<()> {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/auth/v1/signup").json_body(json!({
                    "email": "ayse@example.com",
                    "password": "mercimek",
                    "data": {"display_name": "ayse"}
                }));
                then.status(200).json_body(auth_user_json());
            })
            .await;

        let client = test_client(&server.base_url());
        let outcome = client
            .sign_up(&Registration {
                email: "ayse@example.com".to_string(),
                password: "mercimek".to_string(),
                display_name: Some(" ayse ".to_string()),
            })
            .await?;
        mock.assert_async().await;
        assert_eq!(outcome, SignUpOutcome::ConfirmationRequired);
        Ok(())
    }

    #[tokio::test]
    async fn sign_up_with_session_signs_in() -> RecipeResult<()> {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/auth/v1/signup");
                then.status(200)
                    .json_body(json!({"access_token": "jwt-2", "user": auth_user_json()}));
            })
            .await;

        let client = test_client(&server.base_url());
        let outcome = client
            .sign_up(&Registration {
                email: "ayse@example.com".to_string(),
                password: "mercimek".to_string(),
                display_name: None,
            })
            .await?;
        assert!(matches!(outcome, SignUpOutcome::SignedIn(session) if session.access_token == "jwt-2"));
        Ok(())
    }

    #[tokio::test]
    async fn sign_up_rejection_carries_reason() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/auth/v1/signup");
                then.status(422).json_body(json!({"msg": "User already registered"}));
            })
            .await;

        let client = test_client(&server.base_url());
        let result = client
            .sign_up(&Registration {
                email: "ayse@example.com".to_string(),
                password: "mercimek".to_string(),
                display_name: None,
            })
            .await;
        assert!(matches!(
            result,
            Err(RecipeError::RegistrationRejected { reason }) if reason == "User already registered"
        ));
    }

    #[tokio::test]
    async fn expired_session_is_none() -> RecipeResult<()> {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/auth/v1/user")
                    .header("authorization", "Bearer stale");
                then.status(401).json_body(json!({"msg": "invalid JWT"}));
            })
            .await;

        let client = test_client(&server.base_url());
        assert_eq!(client.session("stale").await?, None);
        mock.assert_async().await;
        Ok(())
    }

    #[tokio::test]
    async fn session_maps_user_metadata() -> RecipeResult<()> {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/auth/v1/user");
                then.status(200).json_body(auth_user_json());
            })
            .await;

        let client = test_client(&server.base_url());
        let user = client.session("jwt-1").await?;
        assert_eq!(user.and_then(|user| user.display_name).as_deref(), Some("ayse"));
        Ok(())
    }

    #[tokio::test]
    async fn sign_out_tolerates_revoked_token() -> RecipeResult<()> {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/auth/v1/logout")
                    .header("authorization", "Bearer jwt-1");
                then.status(401);
            })
            .await;

        let client = test_client(&server.base_url());
        client.sign_out("jwt-1").await?;
        mock.assert_async().await;
        Ok(())
    }

    #[tokio::test]
    async fn favorites_use_the_user_token() -> RecipeResult<()> {
        let server = MockServer::start_async().await;
        let session = fixtures::session();
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/rest/v1/v_user_library")
                    .query_param("user_id", format!("eq.{}", session.user.id))
                    .query_param("engagement_type", "eq.favorite")
                    .query_param("order", "engaged_at.desc")
                    .header("authorization", format!("Bearer {}", session.access_token));
                then.status(200).json_body(json!([{
                    "recipe_id": 1,
                    "title_en": "Lentil Soup",
                    "title_tr": "Mercimek Çorbası",
                    "description_en": null,
                    "description_tr": null,
                    "cover_image_url": null,
                    "category_slug": "soups"
                }]));
            })
            .await;

        let client = test_client(&server.base_url());
        let favorites = client.favorites(&session).await?;
        mock.assert_async().await;
        assert_eq!(favorites.len(), 1);
        assert_eq!(favorites[0].category_slug.as_deref(), Some("soups"));
        Ok(())
    }

    #[tokio::test]
    async fn add_favorite_ignores_duplicates() -> RecipeResult<()> {
        let server = MockServer::start_async().await;
        let session = fixtures::session();
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/rest/v1/recipe_engagements")
                    .header("prefer", "resolution=ignore-duplicates,return=minimal")
                    .json_body(json!({
                        "user_id": session.user.id,
                        "recipe_id": 7,
                        "engagement_type": "favorite"
                    }));
                then.status(409);
            })
            .await;

        let client = test_client(&server.base_url());
        client.add_favorite(&session, 7).await?;
        mock.assert_async().await;
        Ok(())
    }

    #[tokio::test]
    async fn remove_favorite_filters_by_user_and_recipe() -> RecipeResult<()> {
        let server = MockServer::start_async().await;
        let session = fixtures::session();
        let mock = server
            .mock_async(|when, then| {
                when.method(DELETE)
                    .path("/rest/v1/recipe_engagements")
                    .query_param("recipe_id", "eq.7")
                    .query_param("engagement_type", "eq.favorite");
                then.status(204);
            })
            .await;

        let client = test_client(&server.base_url());
        client.remove_favorite(&session, 7).await?;
        mock.assert_async().await;
        Ok(())
    }

    #[tokio::test]
    async fn library_failures_are_backend_errors() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(DELETE).path("/rest/v1/recipe_engagements");
                then.status(500);
            })
            .await;

        let client = test_client(&server.base_url());
        let result = client.remove_favorite(&fixtures::session(), 7).await;
        assert_eq!(
            result.err().and_then(|err| err.operation()),
            Some("remove_favorite")
        );
    }
}
