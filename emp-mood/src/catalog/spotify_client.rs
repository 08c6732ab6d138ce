//! Spotify Web API catalog client
//!
//! Client-credentials flow: the access token is fetched on first use, cached,
//! and refreshed shortly before it expires (or after a 401). Requests are
//! paced with a token-bucket rate limiter. Response bodies are handed back as
//! raw JSON; parsing them is the sanitizer's job.

use super::CatalogClient;
use crate::config::CatalogCredentials;
use crate::error::{MoodError, MoodResult};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use emp_common::config::CatalogConfig;
use governor::{Quota, RateLimiter};
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use serde_json::Value;
use std::num::NonZeroU32;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info};

const TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const API_BASE_URL: &str = "https://api.spotify.com/v1";

/// Refresh this long before the advertised expiry
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

struct CachedToken {
    access_token: String,
    refresh_at: Instant,
}

/// Spotify catalog client
pub struct SpotifyClient {
    client: Client,
    credentials: CatalogCredentials,
    token_url: String,
    api_base_url: Url,
    token: Mutex<Option<CachedToken>>,
    rate_limiter: RateLimiter<
        governor::state::direct::NotKeyed,
        governor::state::InMemoryState,
        governor::clock::DefaultClock,
    >,
}

impl SpotifyClient {
    /// Create a client against the public Spotify endpoints
    ///
    /// # Errors
    /// * `MoodError::Http` - HTTP client construction failed
    pub fn new(credentials: CatalogCredentials, config: &CatalogConfig) -> MoodResult<Self> {
        Self::with_endpoints(credentials, config, TOKEN_URL, API_BASE_URL)
    }

    /// Create a client against alternative token and API endpoints
    ///
    /// # Errors
    /// * `MoodError::Collaborator` - `api_base_url` is not a usable base URL
    /// * `MoodError::Http` - HTTP client construction failed
    pub fn with_endpoints(
        credentials: CatalogCredentials,
        config: &CatalogConfig,
        token_url: impl Into<String>,
        api_base_url: impl Into<String>,
    ) -> MoodResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.max(1)))
            .connect_timeout(Duration::from_secs(5))
            .build()?;

        let api_base_url = api_base_url.into();
        let api_base_url = match Url::parse(&api_base_url) {
            Ok(url) if !url.cannot_be_a_base() => url,
            Ok(_) => {
                return Err(MoodError::Collaborator(format!(
                    "Catalog API URL '{}' cannot take a path",
                    api_base_url
                )))
            }
            Err(e) => {
                return Err(MoodError::Collaborator(format!(
                    "Invalid catalog API URL '{}': {}",
                    api_base_url, e
                )))
            }
        };

        let per_second = NonZeroU32::new(config.requests_per_second).unwrap_or(NonZeroU32::MIN);

        Ok(Self {
            client,
            credentials,
            token_url: token_url.into(),
            api_base_url,
            token: Mutex::new(None),
            rate_limiter: RateLimiter::direct(Quota::per_second(per_second)),
        })
    }

    async fn access_token(&self) -> MoodResult<String> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.refresh_at {
                return Ok(token.access_token.clone());
            }
            debug!("Catalog access token expired, refreshing");
        }

        self.rate_limiter.until_ready().await;

        let basic = STANDARD.encode(format!(
            "{}:{}",
            self.credentials.client_id, self.credentials.client_secret
        ));
        let response = self
            .client
            .post(&self.token_url)
            .header(reqwest::header::AUTHORIZATION, format!("Basic {}", basic))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MoodError::Collaborator(format!(
                "Catalog token request returned {}: {}",
                status, body
            )));
        }

        let token: TokenResponse = response.json().await?;
        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(TOKEN_EXPIRY_MARGIN);
        info!(expires_in = token.expires_in, "Catalog access token acquired");

        *cached = Some(CachedToken {
            access_token: token.access_token.clone(),
            refresh_at: Instant::now() + lifetime,
        });
        Ok(token.access_token)
    }

    /// API URL with `segments` appended, each percent-encoded as one segment
    fn endpoint(&self, segments: &[&str]) -> MoodResult<Url> {
        let mut url = self.api_base_url.clone();
        url.path_segments_mut()
            .map_err(|_| MoodError::Collaborator("Catalog API URL cannot take a path".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json(&self, segments: &[&str], params: &[(&str, String)]) -> MoodResult<Value> {
        let url = self.endpoint(segments)?;
        let token = self.access_token().await?;
        self.rate_limiter.until_ready().await;

        debug!(url = %url, "Catalog GET");

        let response = self
            .client
            .get(url.clone())
            .bearer_auth(token)
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            // Next call fetches a fresh token
            *self.token.lock().await = None;
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MoodError::Collaborator(format!(
                "Catalog returned {} for {}: {}",
                status,
                url.path(),
                body.chars().take(200).collect::<String>()
            )));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl CatalogClient for SpotifyClient {
    async fn search_collections(
        &self,
        query: &str,
        limit: u32,
        market: Option<&str>,
    ) -> MoodResult<Value> {
        let mut params = vec![
            ("q", query.to_string()),
            ("type", "playlist".to_string()),
            ("limit", limit.to_string()),
        ];
        if let Some(market) = market {
            params.push(("market", market.to_string()));
        }
        self.get_json(&["search"], &params).await
    }

    async fn list_items(&self, collection_id: &str, limit: u32) -> MoodResult<Value> {
        if matches!(collection_id, "." | "..") {
            return Err(MoodError::Collaborator(format!(
                "Invalid collection id '{}'",
                collection_id
            )));
        }
        self.get_json(
            &["playlists", collection_id, "tracks"],
            &[("limit", limit.to_string())],
        )
        .await
    }
}
