use crate::Result;
use bytes::Bytes;
use reqwest::{Proxy, RequestBuilder};
use serde::Serialize;
use std::time::Duration;

/// Longest response body kept in a [`TransportError::Status`].
const MAX_ERROR_BODY_LEN: usize = 512;

/// Client-level knobs for [`HttpTransport`].
#[derive(Debug, Clone)]
pub struct TransportOptions {
    pub timeout: Duration,
    pub proxy_url: Option<String>,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            proxy_url: None,
        }
    }
}

/// Bearer-authenticated JSON/binary HTTP client rooted at a base URL.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>, options: &TransportOptions) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .timeout(options.timeout)
            .pool_idle_timeout(Some(Duration::from_secs(90)));

        if let Some(proxy_url) = &options.proxy_url {
            let proxy = Proxy::all(proxy_url)
                .map_err(|e| TransportError::Other(format!("Invalid proxy URL: {}", e)))?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| TransportError::Other(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self::from_client(client, base_url))
    }

    pub fn from_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    pub async fn post_json<B>(
        &self,
        path: &str,
        api_key: &str,
        body: &B,
    ) -> Result<serde_json::Value>
    where
        B: Serialize + ?Sized,
    {
        let request = self
            .client
            .post(self.url(path))
            .bearer_auth(api_key)
            .json(body);
        let response = Self::send(request).await?;
        let json = response.json().await.map_err(TransportError::Http)?;
        Ok(json)
    }

    pub async fn get_json(
        &self,
        path: &str,
        api_key: &str,
        query: &[(&str, &str)],
    ) -> Result<serde_json::Value> {
        let request = self
            .client
            .get(self.url(path))
            .bearer_auth(api_key)
            .query(query);
        let response = Self::send(request).await?;
        let json = response.json().await.map_err(TransportError::Http)?;
        Ok(json)
    }

    /// GET a binary body. The payload is never decoded as text.
    pub async fn get_bytes(
        &self,
        path: &str,
        api_key: &str,
        query: &[(&str, &str)],
    ) -> Result<Bytes> {
        let request = self
            .client
            .get(self.url(path))
            .bearer_auth(api_key)
            .query(query);
        let response = Self::send(request).await?;
        let bytes = response.bytes().await.map_err(TransportError::Http)?;
        Ok(bytes)
    }

    async fn send(request: RequestBuilder) -> Result<reqwest::Response> {
        let response = request.send().await.map_err(TransportError::Http)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                body: truncate(body),
            }
            .into());
        }
        Ok(response)
    }
}

fn truncate(mut body: String) -> String {
    if body.len() > MAX_ERROR_BODY_LEN {
        let mut cut = MAX_ERROR_BODY_LEN;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
    }
    body
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Transport error: {0}")]
    Other(String),
}

impl TransportError {
    /// Timeouts, connection failures, throttling and 5xx responses.
    ///
    /// Request-building errors are never transient.
    pub fn is_transient(&self) -> bool {
        match self {
            TransportError::Http(e) => e.is_timeout() || e.is_connect(),
            TransportError::Status { status, .. } => *status == 429 || *status >= 500,
            TransportError::Other(_) => false,
        }
    }
}
