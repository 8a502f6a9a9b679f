//! MiniMax asynchronous TTS client.

use super::poll::{poll_until_terminal, PollPolicy};
use super::types::{
    id_to_string, BaseResp, QueryResponse, SubmitResponse, SubmitTaskBody, TaskStatus,
    TtsOutput, TtsRequest,
};
use crate::config::{PluginConfig, DEFAULT_MINIMAX_BASE_URL};
use crate::transport::{HttpTransport, TransportOptions};
use crate::upload::{UploadRequest, Uploader};
use crate::{Error, ErrorContext, Result};
use bytes::Bytes;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, info_span, warn, Instrument};

const SUBMIT_PATH: &str = "/t2a_async_v2";
const QUERY_PATH: &str = "/query/t2a_async_query_v2";
const RETRIEVE_PATH: &str = "/files/retrieve_content";

pub const DEFAULT_FILENAME: &str = "minimax_tts.mp3";

/// Submits a synthesis job, polls it to completion, downloads the audio and
/// re-hosts it through an [`Uploader`].
///
/// Holds no per-job state; one client can serve concurrent calls.
pub struct MinimaxTtsClient {
    transport: HttpTransport,
    uploader: Arc<dyn Uploader>,
    poll: PollPolicy,
    default_filename: String,
}

impl MinimaxTtsClient {
    pub fn builder() -> MinimaxTtsClientBuilder {
        MinimaxTtsClientBuilder::new()
    }

    pub fn poll_policy(&self) -> PollPolicy {
        self.poll
    }

    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }

    pub async fn synthesize(&self, request: &TtsRequest) -> Result<TtsOutput> {
        self.synthesize_with_cancel(request, &CancellationToken::new())
            .await
    }

    /// Like [`synthesize`](Self::synthesize), aborting with
    /// [`Error::Cancelled`] as soon as `cancel` fires. An already cancelled
    /// token makes no vendor call at all.
    pub async fn synthesize_with_cancel(
        &self,
        request: &TtsRequest,
        cancel: &CancellationToken,
    ) -> Result<TtsOutput> {
        request.validate()?;
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let request_id = uuid::Uuid::new_v4();
        let span = info_span!("minimax_tts", %request_id, model = %request.model);
        async move {
            let task_id = until_cancelled(cancel, self.submit(request)).await?;
            info!(chars = request.text.chars().count(), "synthesis task submitted");

            let file_id = poll_until_terminal(self.poll, cancel, |attempt| {
                until_cancelled(cancel, self.query_status(&request.api_key, &task_id, attempt))
            })
            .await?;
            debug!("synthesis task finished");

            let audio = until_cancelled(cancel, self.retrieve(&request.api_key, &file_id)).await?;
            debug!(size = audio.len(), "audio retrieved");

            let upload = self
                .uploader
                .upload(UploadRequest::new(audio, self.default_filename.clone()));
            let uploaded = until_cancelled(cancel, upload)
                .await
                .map_err(|e| match e {
                    Error::Upload { .. } | Error::Cancelled => e,
                    other => Error::upload_with_context(
                        other.to_string(),
                        ErrorContext::new().with_source("uploader"),
                    ),
                })?;
            info!("audio re-hosted");

            Ok(TtsOutput {
                audio_url: uploaded.access_url,
            })
        }
        .instrument(span)
        .await
    }

    async fn submit(&self, request: &TtsRequest) -> Result<String> {
        let body = SubmitTaskBody::new(request);
        let json = self
            .transport
            .post_json(SUBMIT_PATH, &request.api_key, &body)
            .await?;
        let resp: SubmitResponse = decode(json, "submit")?;
        check_base_resp(resp.base_resp.as_ref())?;
        resp.task_id
            .as_ref()
            .and_then(id_to_string)
            .ok_or_else(|| {
                Error::protocol_with_context(
                    "submit response has no task id",
                    ErrorContext::new()
                        .with_field_path("task_id")
                        .with_source("minimax_tts"),
                )
            })
    }

    async fn query_status(&self, api_key: &str, task_id: &str, attempt: u32) -> Result<TaskStatus> {
        let json = self
            .transport
            .get_json(QUERY_PATH, api_key, &[("task_id", task_id)])
            .await?;
        let resp: QueryResponse = decode(json, "query")?;
        check_base_resp(resp.base_resp.as_ref())?;
        let status = resp.status.unwrap_or_default();
        match status.as_str() {
            "Success" => {
                let file_id = resp.file_id.as_ref().and_then(id_to_string).ok_or_else(|| {
                    Error::protocol_with_context(
                        "successful task has no file id",
                        ErrorContext::new()
                            .with_field_path("file_id")
                            .with_source("minimax_tts"),
                    )
                })?;
                Ok(TaskStatus::Success { file_id })
            }
            "Failed" => {
                warn!(attempt, "synthesis task reported failure");
                Ok(TaskStatus::Failed)
            }
            _ => Ok(TaskStatus::Pending(status)),
        }
    }

    async fn retrieve(&self, api_key: &str, file_id: &str) -> Result<Bytes> {
        self.transport
            .get_bytes(RETRIEVE_PATH, api_key, &[("file_id", file_id)])
            .await
    }
}

/// Drops `fut` and returns [`Error::Cancelled`] once `cancel` fires.
async fn until_cancelled<T>(
    cancel: &CancellationToken,
    fut: impl Future<Output = Result<T>>,
) -> Result<T> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(Error::Cancelled),
        res = fut => res,
    }
}

/// A reply that parses as JSON but has the wrong shape is a protocol error.
fn decode<T: serde::de::DeserializeOwned>(json: serde_json::Value, stage: &str) -> Result<T> {
    serde_json::from_value(json).map_err(|e| {
        Error::protocol_with_context(
            format!("unexpected {} response: {}", stage, e),
            ErrorContext::new().with_source("minimax_tts"),
        )
    })
}

fn check_base_resp(base_resp: Option<&BaseResp>) -> Result<()> {
    match base_resp {
        Some(b) if b.status_code != 0 => Err(Error::vendor_task_failure(format!(
            "vendor error {}: {}",
            b.status_code, b.status_msg
        ))),
        _ => Ok(()),
    }
}

pub struct MinimaxTtsClientBuilder {
    base_url: Option<String>,
    transport_options: TransportOptions,
    poll: PollPolicy,
    uploader: Option<Arc<dyn Uploader>>,
    default_filename: Option<String>,
}

impl MinimaxTtsClientBuilder {
    pub fn new() -> Self {
        Self {
            base_url: None,
            transport_options: TransportOptions::default(),
            poll: PollPolicy::default(),
            uploader: None,
            default_filename: None,
        }
    }

    /// Seed every setting from `config`. Later builder calls still override.
    pub fn config(mut self, config: &PluginConfig) -> Self {
        self.base_url = Some(config.minimax.base_url.clone());
        self.transport_options = config.minimax.transport_options();
        self.poll = PollPolicy {
            interval: config.minimax.poll_interval(),
            max_attempts: config.minimax.max_poll_attempts,
        };
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.transport_options.timeout = timeout;
        self
    }
    pub fn proxy_url(mut self, url: impl Into<String>) -> Self {
        self.transport_options.proxy_url = Some(url.into());
        self
    }
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll.interval = interval;
        self
    }
    pub fn max_poll_attempts(mut self, attempts: u32) -> Self {
        self.poll.max_attempts = attempts;
        self
    }
    pub fn uploader(mut self, uploader: Arc<dyn Uploader>) -> Self {
        self.uploader = Some(uploader);
        self
    }
    pub fn default_filename(mut self, name: impl Into<String>) -> Self {
        self.default_filename = Some(name.into());
        self
    }

    pub fn build(self) -> Result<MinimaxTtsClient> {
        let uploader = self
            .uploader
            .ok_or_else(|| Error::configuration("An uploader must be specified"))?;
        if self.poll.max_attempts == 0 {
            return Err(Error::configuration_with_context(
                "max_poll_attempts must be at least 1",
                ErrorContext::new().with_field_path("minimax.max_poll_attempts"),
            ));
        }
        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_MINIMAX_BASE_URL.to_string());
        let transport = HttpTransport::new(base_url, &self.transport_options)?;
        Ok(MinimaxTtsClient {
            transport,
            uploader,
            poll: self.poll,
            default_filename: self
                .default_filename
                .unwrap_or_else(|| DEFAULT_FILENAME.to_string()),
        })
    }
}

impl Default for MinimaxTtsClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
