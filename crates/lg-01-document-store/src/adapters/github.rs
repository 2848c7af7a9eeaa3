//! GitHub contents API backend.
//!
//! The league document lives as a file in a repository. Reads return the
//! file's blob SHA as the version token; writes are commits that must name
//! the blob SHA they replace.

use crate::domain::{CommitMetadata, StoreError, StoredDocument, WriteReceipt};
use crate::ports::outbound::DocumentStore;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, RETRY_AFTER, USER_AGENT};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use shared_types::VersionToken;
use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

const API_VERSION_HEADER: &str = "x-github-api-version";
const API_VERSION: &str = "2022-11-28";
const RATELIMIT_REMAINING: &str = "x-ratelimit-remaining";
const RATELIMIT_RESET: &str = "x-ratelimit-reset";
const RAW_MEDIA_TYPE: &str = "application/vnd.github.raw";

/// Connection settings for the repository holding the document.
#[derive(Clone)]
pub struct GitHubStoreConfig {
    /// API root, e.g. `https://api.github.com`.
    pub api_url: String,
    /// `owner/name` of the repository.
    pub repository: String,
    pub branch: String,
    pub token: String,
    /// Upper bound for each HTTP round trip.
    pub timeout: Duration,
    pub user_agent: String,
}

impl GitHubStoreConfig {
    pub fn new(repository: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            api_url: "https://api.github.com".to_string(),
            repository: repository.into(),
            branch: "main".to_string(),
            token: token.into(),
            timeout: Duration::from_secs(10),
            user_agent: format!("league-hub/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    fn contents_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/contents/{}",
            self.api_url.trim_end_matches('/'),
            self.repository,
            path.trim_start_matches('/')
        )
    }
}

impl fmt::Debug for GitHubStoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitHubStoreConfig")
            .field("api_url", &self.api_url)
            .field("repository", &self.repository)
            .field("branch", &self.branch)
            .field("token", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Deserialize)]
struct ContentsResponse {
    sha: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    encoding: String,
    #[serde(default)]
    size: u64,
}

#[derive(Serialize)]
struct PutContentsRequest<'a> {
    message: &'a str,
    content: String,
    branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
}

#[derive(Deserialize)]
struct PutContentsResponse {
    content: PutContentRef,
    #[serde(default)]
    commit: Option<PutCommitRef>,
}

#[derive(Deserialize)]
struct PutContentRef {
    sha: String,
}

#[derive(Deserialize)]
struct PutCommitRef {
    sha: String,
    #[serde(default)]
    html_url: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// `DocumentStore` backed by a GitHub repository.
pub struct GitHubContentStore {
    client: Client,
    config: GitHubStoreConfig,
}

impl GitHubContentStore {
    pub fn new(config: GitHubStoreConfig) -> Result<Self, StoreError> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.token))
            .map_err(|_| StoreError::CredentialRejected("token is not a valid header value".into()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert(API_VERSION_HEADER, HeaderValue::from_static(API_VERSION));
        let agent = HeaderValue::from_str(&config.user_agent)
            .unwrap_or_else(|_| HeaderValue::from_static("league-hub"));
        headers.insert(USER_AGENT, agent);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .connect_timeout(config.timeout.min(Duration::from_secs(5)))
            .build()
            .map_err(|e| StoreError::Transient(format!("http client setup failed: {e}")))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &GitHubStoreConfig {
        &self.config
    }

    /// Files over the inline size limit come back with an empty `content`;
    /// fetch the raw bytes instead.
    async fn fetch_raw(&self, path: &str) -> Result<Vec<u8>, StoreError> {
        let response = self
            .client
            .get(self.config.contents_url(path))
            .query(&[("ref", self.config.branch.as_str())])
            .header(ACCEPT, RAW_MEDIA_TYPE)
            .send()
            .await
            .map_err(transport_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(error_from_response(path, response).await);
        }
        let bytes = response.bytes().await.map_err(transport_error)?;
        debug!(path, status = status.as_u16(), bytes = bytes.len(), "Fetched raw document");
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl DocumentStore for GitHubContentStore {
    fn backend_tag(&self) -> &'static str {
        "github"
    }

    async fn fetch(&self, path: &str) -> Result<StoredDocument, StoreError> {
        let response = self
            .client
            .get(self.config.contents_url(path))
            .query(&[("ref", self.config.branch.as_str())])
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(error_from_response(path, response).await);
        }

        let body: ContentsResponse = response
            .json()
            .await
            .map_err(|e| StoreError::Corrupt(format!("contents response: {e}")))?;

        let content = if body.content.is_empty() && body.size > 0 {
            self.fetch_raw(path).await?
        } else if body.encoding == "base64" || body.encoding.is_empty() {
            decode_content(&body.content)?
        } else {
            return Err(StoreError::Corrupt(format!(
                "unsupported content encoding '{}'",
                body.encoding
            )));
        };

        debug!(path, version = %body.sha, bytes = content.len(), "Fetched document");
        Ok(StoredDocument {
            content,
            version: VersionToken::new(body.sha),
        })
    }

    async fn write(
        &self,
        path: &str,
        content: &[u8],
        expected: Option<&VersionToken>,
        description: &str,
    ) -> Result<WriteReceipt, StoreError> {
        let request = PutContentsRequest {
            message: description,
            content: STANDARD.encode(content),
            branch: &self.config.branch,
            sha: expected.map(VersionToken::as_str),
        };

        let response = self
            .client
            .put(self.config.contents_url(path))
            .json(&request)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            let err = error_from_response(path, response).await;
            // Without a token the API reports "sha wasn't supplied" as 422,
            // and a missing path on update as 404: both mean the create/update
            // precondition did not hold.
            return Err(match err {
                StoreError::NotFound { path } if expected.is_some() => {
                    StoreError::VersionConflict { path }
                }
                other => other,
            });
        }

        let body: PutContentsResponse = response
            .json()
            .await
            .map_err(|e| StoreError::Corrupt(format!("write response: {e}")))?;

        debug!(path, version = %body.content.sha, "Committed document");
        Ok(WriteReceipt {
            version: VersionToken::new(body.content.sha),
            commit: CommitMetadata {
                sha: body.commit.as_ref().map(|c| c.sha.clone()),
                message: description.to_string(),
                url: body.commit.and_then(|c| c.html_url),
            },
        })
    }
}

/// Inline content arrives base64-encoded with embedded line breaks.
fn decode_content(encoded: &str) -> Result<Vec<u8>, StoreError> {
    let compact: String = encoded.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    STANDARD
        .decode(compact)
        .map_err(|e| StoreError::Corrupt(format!("invalid base64 content: {e}")))
}

fn transport_error(err: reqwest::Error) -> StoreError {
    if err.is_timeout() {
        StoreError::Transient("request timed out".to_string())
    } else if err.is_connect() {
        StoreError::Transient(format!("connection failed: {err}"))
    } else {
        StoreError::Transient(err.to_string())
    }
}

async fn error_from_response(path: &str, response: reqwest::Response) -> StoreError {
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.text().await.unwrap_or_default();
    let err = classify_failure(path, status, &headers, &body, unix_now());
    warn!(path, status = status.as_u16(), error = %err, "Store request failed");
    err
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn header_u64(headers: &HeaderMap, name: &str) -> Option<u64> {
    headers.get(name)?.to_str().ok()?.trim().parse().ok()
}

/// Map a non-success response to a `StoreError`.
fn classify_failure(
    path: &str,
    status: StatusCode,
    headers: &HeaderMap,
    body: &str,
    now_unix: u64,
) -> StoreError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.message)
        .unwrap_or_else(|_| body.chars().take(200).collect());

    let quota_exhausted = status == StatusCode::TOO_MANY_REQUESTS
        || header_u64(headers, RATELIMIT_REMAINING) == Some(0)
        || message.to_lowercase().contains("rate limit");

    match status {
        StatusCode::NOT_FOUND => StoreError::NotFound {
            path: path.to_string(),
        },
        StatusCode::CONFLICT => StoreError::VersionConflict {
            path: path.to_string(),
        },
        StatusCode::UNPROCESSABLE_ENTITY if message.to_lowercase().contains("sha") => {
            StoreError::VersionConflict {
                path: path.to_string(),
            }
        }
        StatusCode::TOO_MANY_REQUESTS | StatusCode::FORBIDDEN if quota_exhausted => {
            let retry_after_secs = header_u64(headers, RETRY_AFTER.as_str()).or_else(|| {
                header_u64(headers, RATELIMIT_RESET).map(|reset| reset.saturating_sub(now_unix))
            });
            StoreError::RateLimited { retry_after_secs }
        }
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => StoreError::CredentialRejected(message),
        s if s.is_server_error() => StoreError::Transient(format!("{}: {}", s.as_u16(), message)),
        s => StoreError::Rejected(format!("{}: {}", s.as_u16(), message)),
    }
}
