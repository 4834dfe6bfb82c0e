use super::{ReleaseInfo, ReleaseSource, Repository};
use crate::config::UpdateSettings;
use crate::constants::{DEFAULT_USER_AGENT, GITHUB_ACCEPT_HEADER, GITHUB_API_BASE_URL};
use crate::core::UpdraftError;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Builder for [`GithubClient`].
#[derive(Debug, Default)]
pub struct GithubClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    token: Option<String>,
}

impl GithubClientBuilder {
    /// Base API URL, e.g. a GitHub Enterprise host or a local mock server.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// `User-Agent` header value.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Bearer token.
    pub fn token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns [`UpdraftError::InvalidUrl`] when the base URL does not parse, or
    /// [`UpdraftError::Network`] when the HTTP client cannot be created.
    pub fn build(self) -> Result<GithubClient, UpdraftError> {
        let raw_base = self.base_url.unwrap_or_else(|| GITHUB_API_BASE_URL.to_string());
        let base = Url::parse(&raw_base).map_err(|e| UpdraftError::InvalidUrl {
            url: raw_base.clone(),
            reason: e.to_string(),
        })?;
        if base.cannot_be_a_base() {
            return Err(UpdraftError::InvalidUrl {
                url: raw_base,
                reason: "not a base URL".to_string(),
            });
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_ACCEPT_HEADER));

        let client = Client::builder()
            .user_agent(self.user_agent.unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()))
            .default_headers(headers)
            .timeout(self.timeout.unwrap_or_else(crate::constants::default_request_timeout))
            .build()
            .map_err(|e| UpdraftError::Network {
                operation: "create HTTP client".to_string(),
                reason: e.to_string(),
            })?;

        Ok(GithubClient {
            base,
            client,
            token: self.token,
        })
    }
}

/// GitHub REST client for release metadata.
#[derive(Debug, Clone)]
pub struct GithubClient {
    base: Url,
    client: Client,
    token: Option<String>,
}

impl GithubClient {
    /// Create a new builder.
    pub fn builder() -> GithubClientBuilder {
        GithubClientBuilder::default()
    }

    /// Build a client from runtime settings.
    ///
    /// # Errors
    ///
    /// See [`GithubClientBuilder::build`].
    pub fn from_settings(settings: &UpdateSettings) -> Result<Self, UpdraftError> {
        Self::builder()
            .base_url(&settings.api_base_url)
            .timeout(settings.timeout)
            .user_agent(&settings.user_agent)
            .token(settings.github_token.clone())
            .build()
    }

    fn releases_url(&self, repo: &Repository, tail: &[&str]) -> Result<Url, UpdraftError> {
        let mut url = self.base.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|()| UpdraftError::InvalidUrl {
                url: self.base.to_string(),
                reason: "not a base URL".to_string(),
            })?;
            segments.pop_if_empty().extend(["repos", repo.owner(), repo.name(), "releases"]);
            segments.extend(tail);
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, operation: &str) -> Result<T, UpdraftError> {
        let url_text = url.to_string();
        debug!("GET {url_text}");

        let mut request = self.client.get(url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| UpdraftError::from_http(&e, operation, &url_text))?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpdraftError::HttpStatus {
                url: url_text,
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| UpdraftError::from_http(&e, operation, &url_text))?;

        serde_json::from_slice(&body).map_err(|e| UpdraftError::MalformedResponse {
            url: url_text,
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl ReleaseSource for GithubClient {
    async fn latest_release(&self, repo: &Repository) -> Result<ReleaseInfo, UpdraftError> {
        let url = self.releases_url(repo, &["latest"])?;
        self.get_json(url, "fetch latest release").await
    }

    async fn release_by_tag(&self, repo: &Repository, tag: &str) -> Result<ReleaseInfo, UpdraftError> {
        let url = self.releases_url(repo, &["tags", tag])?;
        self.get_json(url, "fetch release by tag").await
    }

    async fn releases(&self, repo: &Repository) -> Result<Vec<ReleaseInfo>, UpdraftError> {
        let url = self.releases_url(repo, &[])?;
        self.get_json(url, "list releases").await
    }
}
