use async_trait::async_trait;
use futures::stream::{StreamExt, TryStreamExt};
use reqwest::Client;
use std::time::Duration;

use super::{ByteStream, ChatRequest, ClientError, Transport};

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/ask";

#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub user_agent: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(120),
            connect_timeout: Duration::from_secs(10),
            user_agent: Some(format!("tutor/{}", env!("CARGO_PKG_VERSION"))),
        }
    }
}

impl HttpConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}

/// POSTs JSON to a fixed endpoint and streams the raw body back.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    endpoint: String,
    config: HttpConfig,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_config(endpoint, HttpConfig::default())
    }

    pub fn with_config(endpoint: impl Into<String>, config: HttpConfig) -> Result<Self, ClientError> {
        let mut builder = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout);

        if let Some(ref ua) = config.user_agent {
            builder = builder.user_agent(ua);
        }

        let client = builder
            .build()
            .map_err(|e| ClientError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            config,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn send(&self, request: &ChatRequest) -> Result<ByteStream, ClientError> {
        let timeout = self.config.timeout;

        tracing::debug!(
            endpoint = %self.endpoint,
            history_len = request.history.len(),
            "Sending chat request"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| ClientError::from_reqwest(&e, timeout))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), body = %body, "Chat request rejected");
            return Err(ClientError::status(status.as_u16()));
        }

        let body = response
            .bytes_stream()
            .map_err(move |e| ClientError::from_reqwest(&e, timeout));

        Ok(body.boxed())
    }
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("endpoint", &self.endpoint)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
