//! `LeagueRemote` over HTTP, talking to the league gateway.

use crate::domain::ClientError;
use crate::ports::LeagueRemote;
use async_trait::async_trait;
use lg_03_dispatcher::ActionRequest;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Path of the action endpoint on the gateway.
const ACTION_PATH: &str = "/api/update-data";

/// Connection settings for [`HttpLeagueClient`].
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// e.g. `https://league.example`
    pub base_url: String,
    /// Shared admin secret, attached to every action that lacks one.
    pub secret: Option<String>,
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl HttpClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            secret: None,
            timeout: Duration::from_secs(15),
            connect_timeout: Duration::from_secs(5),
        }
    }

    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = Some(secret.into());
        self
    }
}

/// HTTP client for the league gateway.
pub struct HttpLeagueClient {
    client: Client,
    config: HttpClientConfig,
}

impl HttpLeagueClient {
    pub fn new(config: HttpClientConfig) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| ClientError::Unreachable {
                url: config.base_url.clone(),
                message: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn transport_error(&self, err: reqwest::Error) -> ClientError {
        if err.is_timeout() {
            ClientError::Timeout
        } else {
            ClientError::Unreachable {
                url: self.config.base_url.clone(),
                message: err.to_string(),
            }
        }
    }

    async fn read_body(&self, response: reqwest::Response) -> Result<(u16, Value), ClientError> {
        let status = response.status().as_u16();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(e))?;
        // Proxies answer outages with HTML; keep the status, drop the body.
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        Ok((status, body))
    }
}

#[async_trait]
impl LeagueRemote for HttpLeagueClient {
    async fn call(&self, mut request: ActionRequest) -> Result<Value, ClientError> {
        if request.secret.is_none() {
            request.secret = self.config.secret.clone();
        }
        debug!(action = %request.action, "Calling league server");

        let response = self
            .client
            .post(self.url(ACTION_PATH))
            .json(&request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let (status, body) = self.read_body(response).await?;
        if !(200..300).contains(&status) {
            return Err(ClientError::from_error_body(status, &body));
        }
        if !body.is_object() {
            return Err(ClientError::Decode(format!(
                "{} replied {status} without a JSON object",
                request.action
            )));
        }
        Ok(body)
    }

    async fn health(&self) -> Result<Value, ClientError> {
        let response = self
            .client
            .get(self.url("/health"))
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let (status, body) = self.read_body(response).await?;
        match status {
            200 | 503 if body.is_object() => Ok(body),
            _ => Err(ClientError::from_error_body(status, &body)),
        }
    }

    fn endpoint(&self) -> String {
        self.config.base_url.clone()
    }
}
