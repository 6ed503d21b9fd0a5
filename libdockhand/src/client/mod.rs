//! HTTP client for the hub REST API.
//!
//! This module provides a thin HTTP client built on reqwest for the handful of
//! hub endpoints dockhand consumes: repository search, tag listing, namespace
//! repository listing and session-token exchange.
//!
//! Every request is echoed at `debug` level with its method, URL and auth
//! scheme before it is sent, and every response body is echoed truncated. The
//! echo only observes; it never changes what the client does.

use crate::auth::{Credentials, mask_secret};
use crate::error::{DockhandError, Result};
use chrono::{DateTime, Utc};
use reqwest::{Client as ReqwestClient, RequestBuilder, StatusCode, Url};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::time::Duration;
use tracing::debug;


/// Default hub API base URL.
pub const DEFAULT_HUB_URL: &str = "https://hub.docker.com";

/// Page size used when listing a namespace's repositories.
pub const DEFAULT_REPOSITORY_PAGE_SIZE: usize = 100;

/// Maximum number of response body characters echoed in debug output.
pub const DEBUG_BODY_LIMIT: usize = 300;

/// One hit from the public repository search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Full repository name (`nginx`, `bitnami/redis`)
    #[serde(rename = "repo_name")]
    pub name: String,
    /// One-line description
    #[serde(default, rename = "short_description")]
    pub description: String,
    /// Number of stars
    #[serde(default, rename = "star_count")]
    pub stars: u64,
    /// Whether this is an official image
    #[serde(default)]
    pub is_official: bool,
}

/// One tag of a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagInfo {
    /// Tag name
    pub name: String,
    /// When the tag was last pushed
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
    /// Compressed size of the tagged image in bytes
    #[serde(default)]
    pub full_size: Option<u64>,
}

/// Generic paginated response from the hub.
#[derive(Debug, Deserialize)]
struct Page<T> {
    #[serde(default = "Vec::new")]
    results: Vec<T>,
}

/// Repository entry from a namespace listing.
#[derive(Debug, Deserialize)]
struct RepositoryEntry {
    name: String,
}

/// Request body for the session-token exchange.
#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

/// Response from the session-token exchange.
#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
}

/// Configuration for the HTTP client.
///
/// # Examples
///
/// ```
/// use libdockhand::client::ClientConfig;
///
/// assert_eq!(ClientConfig::new().timeout_seconds, None);
///
/// let config = ClientConfig::new().with_timeout(60);
/// assert_eq!(config.timeout_seconds, Some(60));
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout in seconds (default: none)
    pub timeout_seconds: Option<u64>,
    /// User-Agent header value
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: None,
            user_agent: format!("dockhand/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the request timeout in seconds.
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = Some(seconds);
        self
    }
}

/// HTTP client for hub API operations.
#[derive(Debug, Clone)]
pub struct Client {
    /// The underlying HTTP client
    http_client: ReqwestClient,
    /// Base hub URL (e.g., "https://hub.docker.com")
    hub_url: String,
    /// Request timeout, kept for error messages
    timeout_seconds: Option<u64>,
}

impl Client {
    /// Creates a new client for the hub at `hub_url` with default configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use libdockhand::client::Client;
    ///
    /// let client = Client::new("https://hub.docker.com/").unwrap();
    /// assert_eq!(client.hub_url(), "https://hub.docker.com");
    /// ```
    pub fn new(hub_url: &str) -> Result<Self> {
        Self::with_config(hub_url, ClientConfig::default())
    }

    /// Creates a new client with custom configuration.
    pub fn with_config(hub_url: &str, config: ClientConfig) -> Result<Self> {
        let normalized_url = Self::normalize_url(hub_url)?;

        let mut builder = ReqwestClient::builder().user_agent(config.user_agent);
        if let Some(seconds) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(seconds));
        }
        let http_client = builder
            .build()
            .map_err(|e| DockhandError::network_with_source("Failed to create HTTP client", e))?;

        Ok(Self {
            http_client,
            hub_url: normalized_url,
            timeout_seconds: config.timeout_seconds,
        })
    }

    /// Normalizes a hub URL by ensuring it has a scheme and removing trailing slashes.
    fn normalize_url(url: &str) -> Result<String> {
        let url = url.trim();

        if url.is_empty() {
            return Err(DockhandError::validation("Hub URL cannot be empty"));
        }

        // Default to https, the hub never serves plain http
        let url = if !url.starts_with("http://") && !url.starts_with("https://") {
            format!("https://{}", url)
        } else {
            url.to_string()
        };

        Ok(url.trim_end_matches('/').to_string())
    }

    /// Returns the base hub URL.
    pub fn hub_url(&self) -> &str {
        &self.hub_url
    }

    /// Searches public repositories.
    ///
    /// Performs `GET /v2/search/repositories/?query=<term>&page_size=<limit>`.
    ///
    /// # Errors
    ///
    /// Returns an error if the hub is unreachable, answers with an error
    /// status, or the body is not a search result page.
    pub async fn search_repositories(&self, term: &str, limit: usize) -> Result<Vec<SearchHit>> {
        let url = self.url_with_params(
            "/v2/search/repositories/",
            &[("query", term), ("page_size", &limit.to_string())],
        )?;

        let page: Page<SearchHit> = self
            .send_json(self.http_client.get(url.clone()), "GET", &url, &Credentials::Anonymous)
            .await?;
        Ok(page.results)
    }

    /// Lists the first page of tags of `namespace/repository`.
    ///
    /// Performs `GET /v2/repositories/<namespace>/<repository>/tags?page_size=<n>`.
    /// Official images live in the `library` namespace.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use libdockhand::auth::Credentials;
    /// use libdockhand::client::Client;
    ///
    /// # async fn example() -> libdockhand::error::Result<()> {
    /// let client = Client::new("https://hub.docker.com")?;
    /// let tags = client.fetch_tags("library", "alpine", 25, &Credentials::Anonymous).await?;
    /// for tag in tags {
    ///     println!("{}", tag.name);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn fetch_tags(
        &self,
        namespace: &str,
        repository: &str,
        page_size: usize,
        credentials: &Credentials,
    ) -> Result<Vec<TagInfo>> {
        let url = self.url_with_params(
            &format!("/v2/repositories/{}/{}/tags", namespace, repository),
            &[("page_size", &page_size.to_string())],
        )?;

        let page: Page<TagInfo> = self
            .send_json(self.http_client.get(url.clone()), "GET", &url, credentials)
            .await?;
        Ok(page.results)
    }

    /// Lists repository names in `namespace` using `credentials`.
    ///
    /// Performs `GET /v2/repositories/<namespace>/?page_size=<n>`.
    pub async fn list_repositories(
        &self,
        namespace: &str,
        credentials: &Credentials,
    ) -> Result<Vec<String>> {
        let url = self.url_with_params(
            &format!("/v2/repositories/{}/", namespace),
            &[("page_size", &DEFAULT_REPOSITORY_PAGE_SIZE.to_string())],
        )?;

        let page: Page<RepositoryEntry> = self
            .send_json(self.http_client.get(url.clone()), "GET", &url, credentials)
            .await?;
        Ok(page.results.into_iter().map(|entry| entry.name).collect())
    }

    /// Exchanges an identity and token for a hub session token.
    ///
    /// Performs `POST /v2/users/login` with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns an authentication error if the hub rejects the pair.
    pub async fn exchange_session_token(&self, identity: &str, token: &str) -> Result<String> {
        let url = self.url_with_params("/v2/users/login", &[])?;
        debug!(
            username = identity,
            password = %mask_secret(token),
            "session token exchange body"
        );

        let request = self.http_client.post(url.clone()).json(&LoginRequest {
            username: identity,
            password: token,
        });
        let response: LoginResponse = self
            .send_json(request, "POST", &url, &Credentials::Anonymous)
            .await?;

        if response.token.is_empty() {
            return Err(DockhandError::authentication(
                "Hub returned an empty session token",
                None,
            ));
        }
        Ok(response.token)
    }

    fn url_with_params(&self, path: &str, params: &[(&str, &str)]) -> Result<Url> {
        let base = format!("{}{}", self.hub_url, path);
        // parse_with_params leaves a dangling '?' when there are no params
        let parsed = if params.is_empty() {
            Url::parse(&base)
        } else {
            Url::parse_with_params(&base, params)
        };
        parsed
            .map_err(|e| DockhandError::validation_with_source(format!("Invalid URL {}", base), e))
    }

    /// Sends a request, echoes it, checks the status and decodes a JSON body.
    async fn send_json<T: DeserializeOwned>(
        &self,
        mut request: RequestBuilder,
        method: &str,
        url: &Url,
        credentials: &Credentials,
    ) -> Result<T> {
        debug!(method, url = %url, auth = credentials.scheme(), "hub request");

        if let Some(auth_header) = credentials.to_header_value() {
            request = request.header(reqwest::header::AUTHORIZATION, auth_header);
        }

        let response = request
            .send()
            .await
            .map_err(|e| self.translate_reqwest_error(e))?;

        let status = response.status();
        let retry_after = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());
        let body = response
            .text()
            .await
            .map_err(|e| DockhandError::network_with_source("Failed to read hub response", e))?;

        debug!(
            status = status.as_u16(),
            body = %truncate(&body, DEBUG_BODY_LIMIT),
            "hub response"
        );

        Self::check_status(status, url, &body, retry_after)?;

        serde_json::from_str(&body).map_err(|e| {
            DockhandError::validation_with_source(
                format!("Failed to parse response from {}", url),
                e,
            )
        })
    }

    /// Translates a reqwest error into a DockhandError.
    fn translate_reqwest_error(&self, error: reqwest::Error) -> DockhandError {
        if error.is_timeout() {
            let after = self
                .timeout_seconds
                .map(|seconds| format!(" after {} seconds", seconds))
                .unwrap_or_default();
            DockhandError::network(format!("Request to {} timed out{}", self.hub_url, after))
        } else if error.is_connect() {
            DockhandError::network_with_source(
                format!("Failed to connect to hub at {}", self.hub_url),
                error,
            )
        } else {
            DockhandError::network_with_source(
                format!("Network error communicating with {}", self.hub_url),
                error,
            )
        }
    }

    /// Maps a non-success status to the matching error.
    fn check_status(
        status: StatusCode,
        url: &Url,
        body: &str,
        retry_after: Option<u64>,
    ) -> Result<()> {
        if status.is_success() {
            return Ok(());
        }

        let body = truncate(body, DEBUG_BODY_LIMIT);
        match status {
            StatusCode::UNAUTHORIZED => Err(DockhandError::authentication(
                format!("Authentication required for {}: {}", url, body),
                Some(401),
            )),
            StatusCode::FORBIDDEN => Err(DockhandError::authentication(
                format!("Access forbidden for {}: {}", url, body),
                Some(403),
            )),
            StatusCode::NOT_FOUND => Err(DockhandError::not_found("endpoint", url.as_str())),
            StatusCode::TOO_MANY_REQUESTS => Err(DockhandError::rate_limit(
                format!("Rate limit exceeded for {}", url),
                retry_after,
            )),
            s if s.is_server_error() => Err(DockhandError::server(
                format!("Server error from {}: {}", url, body),
                s.as_u16(),
            )),
            _ => Err(DockhandError::network(format!(
                "HTTP {} from {}: {}",
                status.as_u16(),
                url,
                body
            ))),
        }
    }
}

/// Shortens `text` to at most `limit` characters, marking the cut.
pub fn truncate(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let kept: String = text.chars().take(limit).collect();
    format!("{}...", kept)
}
