//! Nexus Repository Manager REST client.
//!
//! A [`NexusClient`] is built for exactly one tool call from that call's
//! [`ConnectionParams`] and dropped when the call ends; nothing about it is
//! shared between callers. Connections are opened lazily on first request.

use super::credentials::ConnectionParams;
use super::error::{NexusError, NexusResult};
use super::record::AssetLink;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, warn};

/// Path of the REST API below the instance base URL.
pub const API_BASE: &str = "/service/rest/v1";

/// Per-client settings derived from server configuration.
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
    /// Stop following backend continuation tokens after this many items.
    pub max_backend_items: usize,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            max_backend_items: 1000,
        }
    }
}

/// A component as returned by `/search` and `/components`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub repository: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub assets: Vec<Asset>,
}

impl Component {
    pub fn repository(&self) -> &str {
        self.repository.as_deref().unwrap_or_default()
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    pub fn version(&self) -> &str {
        self.version.as_deref().unwrap_or_default()
    }

    pub fn format(&self) -> &str {
        self.format.as_deref().unwrap_or_default()
    }

    /// Total of the reported asset sizes, if any asset reports one.
    pub fn total_size(&self) -> Option<u64> {
        self.assets
            .iter()
            .filter_map(|a| a.file_size)
            .fold(None, |acc, size| Some(acc.unwrap_or(0) + size))
    }

    /// Download locations of every asset that reports a path or URL.
    pub fn asset_links(&self) -> Vec<AssetLink> {
        self.assets
            .iter()
            .filter(|a| a.path.is_some() || a.download_url.is_some())
            .map(|a| AssetLink {
                path: a.path.clone().unwrap_or_default(),
                download_url: a.download_url.clone().unwrap_or_default(),
                content_type: a.content_type.clone(),
            })
            .collect()
    }

    /// `sha256:`-prefixed digest of the first asset that carries one.
    pub fn digest(&self) -> Option<String> {
        self.assets
            .iter()
            .find_map(|a| a.checksum.as_ref().and_then(|c| c.sha256.clone()))
            .map(|sha| {
                if sha.starts_with("sha256:") {
                    sha
                } else {
                    format!("sha256:{}", sha)
                }
            })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub checksum: Option<Checksum>,
    #[serde(default)]
    pub file_size: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Checksum {
    #[serde(default)]
    pub sha1: Option<String>,
    #[serde(default)]
    pub sha256: Option<String>,
}

/// One backend page. `continuation_token` is Nexus's own paging token and
/// never leaves this module's callers.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    #[serde(default)]
    pub items: Vec<Component>,
    #[serde(default)]
    pub continuation_token: Option<String>,
}

/// Filters for the `/search` endpoint. Unset filters are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    pub repository: Option<String>,
    pub format: Option<String>,
    pub group: Option<String>,
    pub name: Option<String>,
    pub version: Option<String>,
}

impl SearchQuery {
    pub fn format(format: &str) -> Self {
        Self {
            format: Some(format.to_string()),
            ..Default::default()
        }
    }

    pub fn repository(mut self, repository: Option<&str>) -> Self {
        self.repository = repository.map(String::from);
        self
    }

    pub fn group(mut self, group: Option<&str>) -> Self {
        self.group = group.map(String::from);
        self
    }

    pub fn name(mut self, name: Option<&str>) -> Self {
        self.name = name.map(String::from);
        self
    }

    pub fn version(mut self, version: Option<&str>) -> Self {
        self.version = version.map(String::from);
        self
    }

    fn pairs(&self) -> Vec<(&'static str, &str)> {
        [
            ("repository", &self.repository),
            ("format", &self.format),
            ("group", &self.group),
            ("name", &self.name),
            ("version", &self.version),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.as_deref().map(|v| (key, v)))
        .collect()
    }
}

/// Basic-auth client bound to one caller's Nexus instance.
pub struct NexusClient {
    http: reqwest::Client,
    base_url: String,
    username: String,
    password: String,
    max_backend_items: usize,
    limit_reached: AtomicBool,
}

impl std::fmt::Debug for NexusClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NexusClient")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl NexusClient {
    /// Build a client for one call.
    pub fn new(params: &ConnectionParams, settings: &ClientSettings) -> NexusResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .connect_timeout(settings.connect_timeout)
            .danger_accept_invalid_certs(!params.verify_tls())
            .user_agent(concat!("nexus-mcp/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| NexusError::ClientBuild(e.to_string()))?;

        Ok(Self {
            http,
            base_url: params.instance().to_string(),
            username: params.username().to_string(),
            password: params.password().to_string(),
            max_backend_items: settings.max_backend_items,
            limit_reached: AtomicBool::new(false),
        })
    }

    /// Instance base URL without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}{}{}", self.base_url, API_BASE, endpoint)
    }

    /// GET a JSON document. A 404 yields `Ok(None)`.
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> NexusResult<Option<T>> {
        let url = self.endpoint_url(endpoint);
        debug!(instance = %self.base_url, endpoint, "Nexus request");

        let response = self
            .http
            .get(&url)
            .basic_auth(&self.username, Some(&self.password))
            .query(query)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    NexusError::BackendUnavailable(format!("request to {} timed out", url))
                } else {
                    NexusError::BackendUnavailable(format!(
                        "failed to connect to Nexus at {}: {}",
                        self.base_url, e
                    ))
                }
            })?;

        let status = response.status();
        match status.as_u16() {
            401 | 403 => {
                return Err(NexusError::AuthenticationFailed {
                    status: status.as_u16(),
                })
            }
            404 => {
                debug!(instance = %self.base_url, endpoint, "Nexus returned 404, treating as empty");
                return Ok(None);
            }
            _ => {}
        }

        if status.is_server_error() {
            return Err(NexusError::BackendUnavailable(format!(
                "Nexus returned HTTP {} for {}",
                status, endpoint
            )));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let excerpt: String = body.chars().take(200).collect();
            return Err(NexusError::UnexpectedResponse(format!(
                "HTTP {} for {}: {}",
                status, endpoint, excerpt
            )));
        }

        let parsed = response.json::<T>().await.map_err(|e| {
            if e.is_timeout() {
                NexusError::BackendUnavailable(format!("reading response from {} timed out", url))
            } else {
                NexusError::UnexpectedResponse(format!("invalid JSON from {}: {}", endpoint, e))
            }
        })?;
        Ok(Some(parsed))
    }

    /// One page of `/search`.
    pub async fn search(
        &self,
        query: &SearchQuery,
        continuation_token: Option<&str>,
    ) -> NexusResult<SearchPage> {
        let mut params = query.pairs();
        if let Some(token) = continuation_token {
            params.push(("continuationToken", token));
        }
        Ok(self
            .get_json::<SearchPage>("/search", &params)
            .await?
            .unwrap_or_default())
    }

    /// Every `/search` result, following backend continuation tokens until
    /// they run out or `max_backend_items` is reached.
    ///
    /// Hitting the limit with results left over is recorded and reported by
    /// [`NexusClient::backend_limit_reached`].
    pub async fn search_all(&self, query: &SearchQuery) -> NexusResult<Vec<Component>> {
        let mut items: Vec<Component> = Vec::new();
        let mut token: Option<String> = None;

        loop {
            let page = self.search(query, token.as_deref()).await?;
            items.extend(page.items);

            let next = page
                .continuation_token
                .filter(|next| !next.is_empty() && token.as_deref() != Some(next.as_str()));

            if items.len() >= self.max_backend_items {
                if items.len() > self.max_backend_items || next.is_some() {
                    warn!(
                        instance = %self.base_url,
                        limit = self.max_backend_items,
                        "backend result set capped; results are incomplete"
                    );
                    self.limit_reached.store(true, Ordering::Relaxed);
                }
                items.truncate(self.max_backend_items);
                break;
            }

            match next {
                Some(next) => token = Some(next),
                None => break,
            }
        }
        Ok(items)
    }

    /// Whether any `search_all` on this client stopped at `max_backend_items`
    /// with results left unread.
    pub fn backend_limit_reached(&self) -> bool {
        self.limit_reached.load(Ordering::Relaxed)
    }
}
