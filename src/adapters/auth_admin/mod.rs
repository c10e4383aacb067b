//! Client for the managed auth service's admin API.
//!
//! Identities and their ban timestamps live in the auth service; this adapter
//! only reads them and sets or clears `banned_until` through `ban_duration`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use url::Url;
use uuid::Uuid;

use crate::{
    app_error::{AppError, AppResult},
    application::use_cases::moderation::IdentityStore,
    domain::entities::identity::Identity,
    infra::http_client,
};

const USERS_PAGE_SIZE: usize = 1000;

/// `ban_duration` value that lifts a ban.
const BAN_DURATION_NONE: &str = "none";

#[derive(Clone)]
pub struct AuthAdminClient {
    client: Client,
    base_url: Url,
    service_key: SecretString,
}

#[derive(Debug, Deserialize)]
struct AuthUser {
    id: Uuid,
    email: Option<String>,
    banned_until: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct UserList {
    #[serde(default)]
    users: Vec<AuthUser>,
}

#[derive(Serialize)]
struct BanUpdate<'a> {
    ban_duration: &'a str,
}

impl From<AuthUser> for Identity {
    fn from(user: AuthUser) -> Self {
        Identity {
            id: user.id,
            email: user.email,
            banned_until: user.banned_until,
        }
    }
}

impl AuthAdminClient {
    pub fn new(base_url: Url, service_key: SecretString) -> Self {
        Self {
            client: http_client::build_client(),
            base_url,
            service_key,
        }
    }

    fn endpoint(&self, path: &str) -> AppResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| AppError::Internal(format!("Invalid auth admin URL: {e}")))
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        let key = self.service_key.expose_secret();
        request.header("apikey", key).bearer_auth(key)
    }

    async fn send(&self, request: RequestBuilder) -> AppResult<reqwest::Response> {
        self.authorized(request)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Auth admin request failed: {e}")))
    }

    async fn update_ban(&self, user_id: Uuid, ban_duration: &str) -> AppResult<Option<Identity>> {
        let url = self.endpoint(&format!("auth/v1/admin/users/{user_id}"))?;
        let response = self
            .send(self.client.put(url).json(&BanUpdate { ban_duration }))
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let user: AuthUser = handle_response(response).await?;
        Ok(Some(user.into()))
    }
}

#[async_trait]
impl IdentityStore for AuthAdminClient {
    async fn get_by_id(&self, user_id: Uuid) -> AppResult<Option<Identity>> {
        let url = self.endpoint(&format!("auth/v1/admin/users/{user_id}"))?;
        let response = self.send(self.client.get(url)).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let user: AuthUser = handle_response(response).await?;
        Ok(Some(user.into()))
    }

    async fn list_all(&self) -> AppResult<Vec<Identity>> {
        let mut identities = Vec::new();
        let mut page = 1usize;
        loop {
            let mut url = self.endpoint("auth/v1/admin/users")?;
            url.query_pairs_mut()
                .append_pair("page", &page.to_string())
                .append_pair("per_page", &USERS_PAGE_SIZE.to_string());

            let response = self.send(self.client.get(url)).await?;
            let list: UserList = handle_response(response).await?;
            let fetched = list.users.len();
            identities.extend(list.users.into_iter().map(Identity::from));

            if fetched < USERS_PAGE_SIZE {
                break;
            }
            page += 1;
        }
        tracing::debug!(count = identities.len(), pages = page, "Listed identities");
        Ok(identities)
    }

    async fn set_ban(&self, user_id: Uuid, hours: i64) -> AppResult<Identity> {
        self.update_ban(user_id, &format!("{hours}h"))
            .await?
            .ok_or_else(AppError::user_not_found)
    }

    async fn clear_ban(&self, user_id: Uuid) -> AppResult<()> {
        if self.update_ban(user_id, BAN_DURATION_NONE).await?.is_none() {
            tracing::warn!(user_id = %user_id, "Identity missing in auth store, nothing to clear");
        }
        Ok(())
    }
}

async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> AppResult<T> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| AppError::Upstream(format!("Failed to read auth admin response: {e}")))?;

    if !status.is_success() {
        tracing::error!(status = %status, body = %body, "Auth admin API error");
        return Err(AppError::Upstream(format!("Auth admin API returned {status}")));
    }

    parse_body(&body)
}

fn parse_body<T: DeserializeOwned>(body: &str) -> AppResult<T> {
    serde_json::from_str(body).map_err(|e| {
        tracing::error!(error = %e, "Failed to parse auth admin response");
        AppError::Upstream(format!("Failed to parse auth admin response: {e}"))
    })
}
