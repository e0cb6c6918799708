use crate::api::models::{ChatRequest, Completion};
use crate::api::response::{classify_error_status, extract_content, extract_usage};
use crate::config::Config;
use crate::error::{RelayError, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;

/// A chat completion backend, called once per relayed message.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, request: &ChatRequest) -> Result<Completion>;
}

pub struct HttpCompletionClient {
    http: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl HttpCompletionClient {
    pub fn new(api_key: &str, endpoint: impl Into<String>, request_timeout: Duration) -> Result<Self> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", api_key)).map_err(|_| {
            RelayError::Config("API key contains characters not allowed in a header".to_string())
        })?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            endpoint: endpoint.into(),
            timeout: request_timeout,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.api_key, config.api_endpoint.clone(), config.request_timeout())
    }

    async fn send(&self, request: &ChatRequest) -> Result<Completion> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        debug!(status = status.as_u16(), "provider responded");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_error_status(status.as_u16(), &body));
        }

        let body: Value = response.json().await.map_err(|e| self.transport_error(e))?;
        Ok(Completion {
            content: extract_content(&body),
            usage: extract_usage(&body),
        })
    }

    fn transport_error(&self, err: reqwest::Error) -> RelayError {
        if err.is_timeout() {
            RelayError::Timeout(self.timeout)
        } else {
            RelayError::Network(err)
        }
    }
}

#[async_trait]
impl CompletionProvider for HttpCompletionClient {
    async fn complete(&self, request: &ChatRequest) -> Result<Completion> {
        match timeout(self.timeout, self.send(request)).await {
            Ok(result) => result,
            Err(_) => Err(RelayError::Timeout(self.timeout)),
        }
    }
}
