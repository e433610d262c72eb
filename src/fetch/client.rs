//! GitHub REST client.
//!
//! [`ProfileSource`] is the seam between the aggregator and the network;
//! [`GitHubClient`] is the reqwest-backed implementation.

use crate::fetch::FetchError;
use crate::models::{ProfileSummary, RepositoryEntry};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Url;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Largest page size GitHub accepts for repository listings.
pub const MAX_PER_PAGE: u32 = 100;

/// Source of account data.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    /// Fetch the account summary for `handle`.
    async fn account_summary(&self, handle: &str) -> Result<ProfileSummary, FetchError>;

    /// Fetch the first page of repositories for `handle`, in server order.
    async fn repositories(&self, handle: &str) -> Result<Vec<RepositoryEntry>, FetchError>;
}

/// Settings for [`GitHubClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: String,
    pub per_page: u32,
    pub sort: String,
    pub repo_type: String,
    pub timeout_seconds: u64,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.github.com".to_string(),
            per_page: MAX_PER_PAGE,
            sort: "created".to_string(),
            repo_type: "owner".to_string(),
            timeout_seconds: 30,
            user_agent: concat!("folio/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl From<&crate::config::ProfileConfig> for ClientConfig {
    fn from(config: &crate::config::ProfileConfig) -> Self {
        Self {
            api_url: config.api_url.clone(),
            per_page: config.per_page.clamp(1, MAX_PER_PAGE),
            sort: config.sort.clone(),
            repo_type: config.repo_type.clone(),
            timeout_seconds: config.timeout_seconds,
            user_agent: config.user_agent.clone(),
        }
    }
}

/// Client for the GitHub users API.
pub struct GitHubClient {
    config: ClientConfig,
    base: Url,
    http: reqwest::Client,
}

impl GitHubClient {
    /// Create a client with its own connection pool.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()
            .context("Failed to create HTTP client")?;

        Self::with_http(config, http)
    }

    /// Create a client around an existing reqwest client.
    pub fn with_http(config: ClientConfig, http: reqwest::Client) -> Result<Self> {
        let base = Url::parse(&config.api_url)
            .with_context(|| format!("Invalid API URL: {}", config.api_url))?;
        if base.cannot_be_a_base() {
            anyhow::bail!("API URL cannot carry a path: {}", config.api_url);
        }

        debug!("GitHub client targeting {}", base);
        Ok(Self { config, base, http })
    }

    /// `<base>/users/<handle>/<tail..>`, with the handle encoded as a
    /// single path segment.
    fn users_endpoint(&self, handle: &str, tail: &[&str]) -> Url {
        let mut url = self.base.clone();
        // Checked in `with_http`
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("users").push(handle).extend(tail);
        }
        url
    }

    /// URL of the account-summary endpoint.
    pub fn summary_url(&self, handle: &str) -> Url {
        self.users_endpoint(handle, &[])
    }

    /// URL of the repositories endpoint (first page only).
    pub fn repos_url(&self, handle: &str) -> Url {
        let mut url = self.users_endpoint(handle, &["repos"]);
        url.query_pairs_mut()
            .append_pair("sort", &self.config.sort)
            .append_pair("type", &self.config.repo_type)
            .append_pair("per_page", &self.config.per_page.to_string());
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, FetchError> {
        debug!("GET {}", url);

        let response = self
            .http
            .get(url.clone())
            .header(ACCEPT, "application/vnd.github+json")
            .send()
            .await
            .map_err(|source| FetchError::Network {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::upstream(url, status.as_u16(), &body));
        }

        let bytes = response.bytes().await.map_err(|source| FetchError::Network {
            url: url.to_string(),
            source,
        })?;

        debug!("{} answered {} ({} bytes)", url, status, bytes.len());

        serde_json::from_slice(&bytes).map_err(|source| FetchError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl ProfileSource for GitHubClient {
    async fn account_summary(&self, handle: &str) -> Result<ProfileSummary, FetchError> {
        self.get_json(self.summary_url(handle)).await
    }

    async fn repositories(&self, handle: &str) -> Result<Vec<RepositoryEntry>, FetchError> {
        self.get_json(self.repos_url(handle)).await
    }
}
