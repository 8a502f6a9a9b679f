//! Mock MiniMax vendor and storage service for integration tests.
//!
//! Fixture methods return unregistered mocks so callers can set `expect`
//! before `create_async`.

use ai_tool_plugins::tts::MinimaxTtsClient;
use ai_tool_plugins::upload::{UploadRequest, UploadedFile, Uploader};
use ai_tool_plugins::{Error, Result};
use async_trait::async_trait;
use mockito::{Matcher, Mock, Server, ServerGuard};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const API_KEY: &str = "sk-test";

/// Uploader that records every payload and answers with a fixed URL.
pub struct RecordingUploader {
    access_url: String,
    fail: bool,
    calls: Mutex<Vec<UploadRequest>>,
}

impl RecordingUploader {
    pub fn new(access_url: impl Into<String>) -> Self {
        Self {
            access_url: access_url.into(),
            fail: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new("")
        }
    }

    pub fn calls(&self) -> Vec<UploadRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Uploader for RecordingUploader {
    async fn upload(&self, request: UploadRequest) -> Result<UploadedFile> {
        self.calls.lock().unwrap().push(request);
        if self.fail {
            return Err(Error::upload("storage unavailable"));
        }
        Ok(UploadedFile {
            access_url: self.access_url.clone(),
        })
    }
}

/// Test fixture owning a mock vendor server and a recording uploader
pub struct MinimaxFixture {
    pub server: ServerGuard,
    pub uploader: Arc<RecordingUploader>,
}

impl MinimaxFixture {
    pub async fn new() -> Self {
        Self::with_uploader(RecordingUploader::new("https://cdn/x.mp3")).await
    }

    pub async fn with_uploader(uploader: RecordingUploader) -> Self {
        Self {
            server: Server::new_async().await,
            uploader: Arc::new(uploader),
        }
    }

    /// Client pointed at the mock server, polling without delay
    pub fn client(&self) -> MinimaxTtsClient {
        MinimaxTtsClient::builder()
            .base_url(self.server.url())
            .poll_interval(Duration::ZERO)
            .timeout(Duration::from_secs(5))
            .uploader(self.uploader.clone())
            .build()
            .expect("client")
    }

    pub fn submit(&mut self, task_id: &str) -> Mock {
        self.submit_body(&format!(
            r#"{{"task_id":"{task_id}","base_resp":{{"status_code":0,"status_msg":"success"}}}}"#
        ))
    }

    pub fn submit_body(&mut self, body: &str) -> Mock {
        self.server
            .mock("POST", "/t2a_async_v2")
            .match_header("authorization", format!("Bearer {API_KEY}").as_str())
            .match_header("content-type", "application/json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
    }

    /// Status query answering `body` every time
    pub fn query(&mut self, task_id: &str, body: &str) -> Mock {
        self.server
            .mock("GET", "/query/t2a_async_query_v2")
            .match_query(Matcher::UrlEncoded("task_id".into(), task_id.into()))
            .match_header("authorization", format!("Bearer {API_KEY}").as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
    }

    /// Status query that reports "Processing" until the `k`-th call, then succeeds
    pub fn query_success_on(&mut self, task_id: &str, k: usize, file_id: &str) -> Mock {
        let counter = AtomicUsize::new(0);
        let success = format!(r#"{{"task_id":"{task_id}","status":"Success","file_id":"{file_id}"}}"#);
        let pending = format!(r#"{{"task_id":"{task_id}","status":"Processing"}}"#);
        self.server
            .mock("GET", "/query/t2a_async_query_v2")
            .match_query(Matcher::UrlEncoded("task_id".into(), task_id.into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body_from_request(move |_| {
                let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                if n >= k {
                    success.clone().into_bytes()
                } else {
                    pending.clone().into_bytes()
                }
            })
    }

    pub fn retrieve(&mut self, file_id: &str, content: &[u8]) -> Mock {
        self.server
            .mock("GET", "/files/retrieve_content")
            .match_query(Matcher::UrlEncoded("file_id".into(), file_id.into()))
            .match_header("authorization", format!("Bearer {API_KEY}").as_str())
            .with_status(200)
            .with_header("content-type", "audio/mpeg")
            .with_body(content)
    }
}
