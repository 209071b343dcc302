//! Depot API client
//!
//! Every list view reads its collections through [`RecordSource`]. [`ApiClient`] is the
//! HTTP implementation; tests substitute an in-memory source.

use std::error::Error as StdError;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error, info, warn};
use validator::Validate;

use crate::config::ApiConfig;
use crate::models::{
    CurrentUser, DailyStat, LogEntry, NewUser, StatsSummary, UserRecord, UserUpdate,
};
use crate::utils::{ConsoleError, ConsoleResult};

/// API paths, relative to the configured base URL
pub mod endpoints {
    pub const LOGS: &str = "/logs";
    pub const USERS_ADMIN: &str = "/users/admin";
    pub const USERS_ME: &str = "/users/me";
    pub const USERS: &str = "/users/";
    pub const STATS: &str = "/stats";
    pub const STATS_DAILY: &str = "/stats/daily";

    pub fn user(id: i64) -> String {
        format!("/users/{}", id)
    }
}

/// Bearer token attached to every call
///
/// `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Value for the `Authorization` header
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0.trim())
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Read and mutation access to the depot's collections
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Full activity log (admin only)
    async fn fetch_logs(&self, credential: &Credential) -> ConsoleResult<Vec<LogEntry>>;

    /// Full user directory (admin only)
    async fn fetch_users(&self, credential: &Credential) -> ConsoleResult<Vec<UserRecord>>;

    /// The caller's own profile
    async fn fetch_current_user(&self, credential: &Credential) -> ConsoleResult<CurrentUser>;

    async fn fetch_stats(&self, credential: &Credential, threshold: u32)
        -> ConsoleResult<StatsSummary>;

    async fn fetch_daily_stats(&self, credential: &Credential, days: u32)
        -> ConsoleResult<Vec<DailyStat>>;

    async fn create_user(&self, credential: &Credential, user: &NewUser)
        -> ConsoleResult<UserRecord>;

    async fn update_user(
        &self,
        credential: &Credential,
        id: i64,
        update: &UserUpdate,
    ) -> ConsoleResult<()>;

    async fn delete_user(&self, credential: &Credential, id: i64) -> ConsoleResult<()>;
}

/// HTTP client for the depot API
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new client from configuration
    pub fn new(config: &ApiConfig) -> ConsoleResult<Self> {
        info!("Initializing depot API client for {}", config.base_url);

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ConsoleError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    fn request(
        &self,
        method: Method,
        endpoint: &str,
        credential: &Credential,
    ) -> ConsoleResult<RequestBuilder> {
        if credential.is_blank() {
            warn!("Refusing to call {} without a credential", endpoint);
            return Err(ConsoleError::Forbidden("No credential".to_string()));
        }

        Ok(self
            .client
            .request(method, self.url(endpoint))
            .header(reqwest::header::AUTHORIZATION, credential.bearer()))
    }

    /// Fetch a JSON array; a `null` body counts as empty
    pub async fn fetch_collection<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        credential: &Credential,
    ) -> ConsoleResult<Vec<T>> {
        let items: Option<Vec<T>> = self.get(endpoint, credential).await?;
        let items = items.unwrap_or_default();
        debug!("Fetched {} records from {}", items.len(), endpoint);
        Ok(items)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        credential: &Credential,
    ) -> ConsoleResult<T> {
        let body = self
            .send(self.request(Method::GET, endpoint, credential)?, endpoint)
            .await?;
        decode(&body)
    }

    async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        endpoint: &str,
        credential: &Credential,
        payload: &B,
    ) -> ConsoleResult<String> {
        let body = serde_json::to_vec(payload)?;
        let builder = self
            .request(method, endpoint, credential)?
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body);
        self.send(builder, endpoint).await
    }

    /// Send a request and return the raw body of a 2xx answer
    async fn send(&self, builder: RequestBuilder, endpoint: &str) -> ConsoleResult<String> {
        debug!("Depot API: sending request to {}", endpoint);
        let response = builder.send().await.map_err(|e| {
            error!("Depot API: request to {} failed: {}", endpoint, e);
            if let Some(source) = e.source() {
                let mut current: &dyn StdError = source;
                error!("Depot API: underlying cause: {}", current);
                while let Some(next) = current.source() {
                    error!("Depot API: caused by: {}", next);
                    current = next;
                }
            }
            ConsoleError::from(e)
        })?;

        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            Ok(body)
        } else {
            warn!("Depot API: {} answered {}", endpoint, status);
            Err(ConsoleError::from_response(status.as_u16(), &body))
        }
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> ConsoleResult<T> {
    serde_json::from_str::<T>(body).map_err(|e| {
        // Truncate body for logging if too long
        let truncated: String = body.chars().take(500).collect();
        error!("Depot API: failed to parse response JSON: {}", truncated);
        ConsoleError::from(e)
    })
}

#[async_trait]
impl RecordSource for ApiClient {
    async fn fetch_logs(&self, credential: &Credential) -> ConsoleResult<Vec<LogEntry>> {
        self.fetch_collection(endpoints::LOGS, credential).await
    }

    async fn fetch_users(&self, credential: &Credential) -> ConsoleResult<Vec<UserRecord>> {
        self.fetch_collection(endpoints::USERS_ADMIN, credential).await
    }

    async fn fetch_current_user(&self, credential: &Credential) -> ConsoleResult<CurrentUser> {
        self.get(endpoints::USERS_ME, credential).await
    }

    async fn fetch_stats(
        &self,
        credential: &Credential,
        threshold: u32,
    ) -> ConsoleResult<StatsSummary> {
        let endpoint = format!("{}?threshold={}", endpoints::STATS, threshold);
        self.get(&endpoint, credential).await
    }

    async fn fetch_daily_stats(
        &self,
        credential: &Credential,
        days: u32,
    ) -> ConsoleResult<Vec<DailyStat>> {
        let endpoint = format!("{}?days={}", endpoints::STATS_DAILY, days);
        self.fetch_collection(&endpoint, credential).await
    }

    async fn create_user(
        &self,
        credential: &Credential,
        user: &NewUser,
    ) -> ConsoleResult<UserRecord> {
        user.validate()?;
        info!("Creating user {}", user.username);
        let body = self
            .send_json(Method::POST, endpoints::USERS, credential, user)
            .await?;
        decode(&body)
    }

    async fn update_user(
        &self,
        credential: &Credential,
        id: i64,
        update: &UserUpdate,
    ) -> ConsoleResult<()> {
        update.validate()?;
        info!("Updating user {}", id);
        self.send_json(Method::PUT, &endpoints::user(id), credential, update)
            .await?;
        Ok(())
    }

    async fn delete_user(&self, credential: &Credential, id: i64) -> ConsoleResult<()> {
        info!("Deleting user {}", id);
        let builder = self.request(Method::DELETE, &endpoints::user(id), credential)?;
        self.send(builder, &endpoints::user(id)).await?;
        Ok(())
    }
}
