//! Access to the GitHub REST API.
//!
//! [`Api`] is the seam between the pipeline and the network: the pipeline only
//! ever needs a status code and a body for a GET, which keeps the retry logic
//! testable against scripted responses.

use crate::error::{ProfileError, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use std::time::Duration;
use tracing::debug;

pub mod repos;
pub mod retry;

pub use repos::{fetch_members, list_repositories};
pub use retry::{FetchOutcome, Fetcher, RetryPolicy, Sleeper, ThreadSleeper};

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_USER_AGENT: &str = concat!("orgfolio/", env!("CARGO_PKG_VERSION"));

/// Raw response of a GET request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

pub trait Api {
    /// Issue a GET for `path`, which is either absolute or relative to the API base.
    fn get(&self, path: &str) -> Result<ApiResponse>;
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub token: Option<String>,
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            token: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl ClientConfig {
    pub fn github(token: Option<String>) -> Self {
        Self {
            token: token.filter(|t| !t.is_empty()),
            ..Default::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

pub struct GitHubClient {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl GitHubClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|e| ProfileError::Config(format!("Invalid user agent: {e}")))?,
        );
        if let Some(token) = &config.token {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| ProfileError::Config(format!("Invalid token: {e}")))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}/{}", self.base_url, path.trim_start_matches('/'))
        }
    }
}

impl Api for GitHubClient {
    fn get(&self, path: &str) -> Result<ApiResponse> {
        let url = self.url(path);
        debug!(%url, "GET");
        let response = self.client.get(&url).send()?;
        let status = response.status().as_u16();
        let body = response.text()?;
        Ok(ApiResponse { status, body })
    }
}
