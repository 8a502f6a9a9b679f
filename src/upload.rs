//! Re-hosting of generated artifacts on the internal storage service.

use crate::config::UploadConfig;
use crate::{Error, ErrorContext, Result};
use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// A binary payload to publish.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub buffer: Bytes,
    /// Filename used when the storage service does not assign one.
    pub default_filename: String,
}

impl UploadRequest {
    pub fn new(buffer: impl Into<Bytes>, default_filename: impl Into<String>) -> Self {
        Self {
            buffer: buffer.into(),
            default_filename: default_filename.into(),
        }
    }

    pub fn mime_type(&self) -> &'static str {
        let ext = self
            .default_filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "mp3" => "audio/mpeg",
            "wav" => "audio/wav",
            "flac" => "audio/flac",
            "pcm" => "audio/pcm",
            "png" => "image/png",
            "jpg" | "jpeg" => "image/jpeg",
            _ => "application/octet-stream",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    /// Publicly resolvable URL of the stored file.
    pub access_url: String,
}

#[async_trait]
pub trait Uploader: Send + Sync {
    async fn upload(&self, request: UploadRequest) -> Result<UploadedFile>;
}

/// Uploads with a multipart `POST` and reads `accessUrl` from the JSON reply.
pub struct HttpUploader {
    client: reqwest::Client,
    endpoint: String,
    token: Option<String>,
}

impl HttpUploader {
    pub fn new(endpoint: impl Into<String>, token: Option<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::configuration(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            token,
        })
    }

    pub fn from_config(config: &UploadConfig) -> Result<Self> {
        let endpoint = config.endpoint.clone().ok_or_else(|| {
            Error::configuration_with_context(
                "upload endpoint is not configured (TOOL_UPLOAD_URL)",
                ErrorContext::new().with_field_path("upload.endpoint"),
            )
        })?;
        Self::new(
            endpoint,
            config.token.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }
}

#[async_trait]
impl Uploader for HttpUploader {
    async fn upload(&self, request: UploadRequest) -> Result<UploadedFile> {
        let mime = request.mime_type();
        let size = request.buffer.len();
        let part = reqwest::multipart::Part::stream_with_length(
            reqwest::Body::from(request.buffer),
            size as u64,
        )
        .file_name(request.default_filename.clone())
        .mime_str(mime)
        .map_err(|e| Error::upload(format!("Invalid mime: {}", e)))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let mut req = self.client.post(&self.endpoint).multipart(form);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        debug!(filename = %request.default_filename, size, "uploading file");

        let response = req.send().await.map_err(|e| {
            Error::upload_with_context(
                format!("upload request failed: {}", e),
                ErrorContext::new().with_source("http_uploader"),
            )
        })?;
        let status = response.status();
        let body = response.text().await.map_err(|e| {
            Error::upload_with_context(
                format!("failed to read upload response: {}", e),
                ErrorContext::new().with_source("http_uploader"),
            )
        })?;
        if !status.is_success() {
            return Err(Error::upload_with_context(
                format!("storage service returned {}: {}", status, body),
                ErrorContext::new().with_source("http_uploader"),
            ));
        }
        serde_json::from_str::<UploadedFile>(&body).map_err(|e| {
            Error::upload_with_context(
                format!("unexpected upload response: {}", e),
                ErrorContext::new()
                    .with_field_path("accessUrl")
                    .with_source("http_uploader"),
            )
        })
    }
}
