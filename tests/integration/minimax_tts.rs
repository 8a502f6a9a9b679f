//! End-to-end behavior of the MiniMax TTS client against a mock vendor

use super::mock_server::{MinimaxFixture, RecordingUploader, API_KEY};
use ai_tool_plugins::tts::{TtsRequest, VoiceSetting};
use ai_tool_plugins::{Error, ErrorKind, MinimaxTtsClient};
use mockito::Matcher;
use serde_json::json;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

fn request() -> TtsRequest {
    TtsRequest {
        api_key: API_KEY.into(),
        text: "hello".into(),
        model: "speech-01".into(),
        voice_setting: VoiceSetting {
            voice_id: "v1".into(),
            speed: 1.0,
            vol: 1.0,
            pitch: 0.0,
            emotion: "neutral".into(),
            en_normalization: true,
        },
    }
}

#[tokio::test]
async fn test_end_to_end_success_on_first_poll() {
    let mut fx = MinimaxFixture::new().await;
    let submit = fx.submit("t1").expect(1).create_async().await;
    let query = fx
        .query("t1", r#"{"task_id":"t1","status":"Success","file_id":"f1"}"#)
        .expect(1)
        .create_async()
        .await;
    let retrieve = fx
        .retrieve("f1", b"\x00\x01")
        .expect(1)
        .create_async()
        .await;

    let out = fx.client().synthesize(&request()).await.unwrap();

    assert_eq!(out.audio_url, "https://cdn/x.mp3");
    assert_eq!(
        serde_json::to_value(&out).unwrap(),
        json!({"audioUrl": "https://cdn/x.mp3"})
    );
    submit.assert_async().await;
    query.assert_async().await;
    retrieve.assert_async().await;

    let uploads = fx.uploader.calls();
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].buffer.as_ref(), b"\x00\x01");
    assert_eq!(uploads[0].default_filename, "minimax_tts.mp3");
}

#[tokio::test]
async fn test_success_on_kth_poll_counts_calls() {
    let mut fx = MinimaxFixture::new().await;
    let submit = fx.submit("t1").expect(1).create_async().await;
    let query = fx
        .query_success_on("t1", 5, "f9")
        .expect(5)
        .create_async()
        .await;
    let retrieve = fx.retrieve("f9", b"ID3").expect(1).create_async().await;

    let out = fx.client().synthesize(&request()).await.unwrap();

    assert_eq!(out.audio_url, "https://cdn/x.mp3");
    submit.assert_async().await;
    query.assert_async().await;
    retrieve.assert_async().await;
}

#[tokio::test]
async fn test_failed_task_stops_polling_and_skips_retrieval() {
    let mut fx = MinimaxFixture::new().await;
    let _submit = fx.submit("t1").create_async().await;
    let query = fx
        .query("t1", r#"{"task_id":"t1","status":"Failed"}"#)
        .expect(1)
        .create_async()
        .await;
    let retrieve = fx.retrieve("f1", b"").expect(0).create_async().await;

    let err = fx.client().synthesize(&request()).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::VendorTaskFailure);
    assert!(!err.is_retryable());
    query.assert_async().await;
    retrieve.assert_async().await;
    assert!(fx.uploader.calls().is_empty());
}

#[tokio::test]
async fn test_never_terminal_times_out_after_180_queries() {
    let mut fx = MinimaxFixture::new().await;
    let _submit = fx.submit("t1").create_async().await;
    let query = fx
        .query("t1", r#"{"task_id":"t1","status":"Processing"}"#)
        .expect(180)
        .create_async()
        .await;
    let retrieve = fx.retrieve("f1", b"").expect(0).create_async().await;

    let err = fx.client().synthesize(&request()).await.unwrap_err();

    assert!(matches!(err, Error::PollTimeout { attempts: 180 }));
    assert_eq!(err.kind(), ErrorKind::PollTimeout);
    query.assert_async().await;
    retrieve.assert_async().await;
}

#[tokio::test]
async fn test_unknown_status_is_treated_as_pending() {
    let mut fx = MinimaxFixture::new().await;
    let _submit = fx.submit("t1").create_async().await;
    let query = fx
        .query("t1", r#"{"task_id":"t1","status":"Expired"}"#)
        .expect(3)
        .create_async()
        .await;

    let client = MinimaxTtsClient::builder()
        .base_url(fx.server.url())
        .poll_interval(Duration::ZERO)
        .max_poll_attempts(3)
        .uploader(fx.uploader.clone())
        .build()
        .unwrap();
    let err = client.synthesize(&request()).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::PollTimeout);
    query.assert_async().await;
}

#[tokio::test]
async fn test_invalid_input_makes_no_network_calls() {
    let mut fx = MinimaxFixture::new().await;
    let submit = fx.submit("t1").expect(0).create_async().await;
    let client = fx.client();

    let mut empty_text = request();
    empty_text.text.clear();
    let mut empty_model = request();
    empty_model.model.clear();

    for req in [empty_text, empty_model] {
        let err = client.synthesize(&req).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
    submit.assert_async().await;
    assert!(fx.uploader.calls().is_empty());
}

#[tokio::test]
async fn test_fixed_parameters_always_sent() {
    let mut fx = MinimaxFixture::new().await;
    let submit = fx
        .server
        .mock("POST", "/t2a_async_v2")
        .match_body(Matcher::PartialJson(json!({
            "model": "speech-01",
            "text": "hello",
            "language_boost": "auto",
            "voice_setting": {
                "voice_id": "v1", "speed": 1.5, "vol": 2.0, "pitch": 3.0,
                "emotion": "happy", "en_normalization": false
            },
            "pronunciation_dict": {"tone": []},
            "audio_setting": {"audio_sample_rate": 32000, "bitrate": 128000, "format": "mp3", "channel": 2},
            "voice_modify": {"pitch": 0, "intensity": 0, "timbre": 0, "sound_effects": "spacious_echo"}
        })))
        .with_status(200)
        .with_body(r#"{"task_id":"t1"}"#)
        .expect(1)
        .create_async()
        .await;
    let _query = fx
        .query("t1", r#"{"status":"Success","file_id":"f1"}"#)
        .create_async()
        .await;
    let _retrieve = fx.retrieve("f1", b"\x00").create_async().await;

    let mut req = request();
    req.voice_setting = VoiceSetting {
        voice_id: "v1".into(),
        speed: 1.5,
        vol: 2.0,
        pitch: 3.0,
        emotion: "happy".into(),
        en_normalization: false,
    };
    fx.client().synthesize(&req).await.unwrap();
    submit.assert_async().await;
}

#[tokio::test]
async fn test_numeric_ids_are_accepted() {
    let mut fx = MinimaxFixture::new().await;
    let _submit = fx
        .submit_body(r#"{"task_id":95157322514444}"#)
        .create_async()
        .await;
    let _query = fx
        .query(
            "95157322514444",
            r#"{"status":"Success","file_id":176844028768320}"#,
        )
        .create_async()
        .await;
    let retrieve = fx
        .retrieve("176844028768320", b"\x01")
        .expect(1)
        .create_async()
        .await;

    fx.client().synthesize(&request()).await.unwrap();
    retrieve.assert_async().await;
}

#[tokio::test]
async fn test_vendor_rejection_on_submit() {
    let mut fx = MinimaxFixture::new().await;
    let _submit = fx
        .submit_body(r#"{"base_resp":{"status_code":1004,"status_msg":"authentication failed"}}"#)
        .create_async()
        .await;
    let query = fx.query("t1", "{}").expect(0).create_async().await;

    let err = fx.client().synthesize(&request()).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::VendorTaskFailure);
    assert!(err.to_string().contains("authentication failed"));
    query.assert_async().await;
}

#[tokio::test]
async fn test_missing_task_id_is_network_kind() {
    let mut fx = MinimaxFixture::new().await;
    let _submit = fx.submit_body("{}").create_async().await;

    let err = fx.client().synthesize(&request()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Network);
}

#[tokio::test]
async fn test_http_error_on_retrieve_is_network_error() {
    let mut fx = MinimaxFixture::new().await;
    let _submit = fx.submit("t1").create_async().await;
    let _query = fx
        .query("t1", r#"{"status":"Success","file_id":"f1"}"#)
        .create_async()
        .await;
    let _retrieve = fx
        .server
        .mock("GET", "/files/retrieve_content")
        .match_query(Matcher::Any)
        .with_status(502)
        .create_async()
        .await;

    let err = fx.client().synthesize(&request()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Network);
    assert!(err.is_retryable());
    assert!(fx.uploader.calls().is_empty());
}

#[tokio::test]
async fn test_upload_failure_is_upload_kind() {
    let mut fx = MinimaxFixture::with_uploader(RecordingUploader::failing()).await;
    let _submit = fx.submit("t1").create_async().await;
    let _query = fx
        .query("t1", r#"{"status":"Success","file_id":"f1"}"#)
        .create_async()
        .await;
    let _retrieve = fx.retrieve("f1", b"\x00").create_async().await;

    let err = fx.client().synthesize(&request()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Upload);
    assert_eq!(fx.uploader.calls().len(), 1);
}

#[tokio::test]
async fn test_cancelled_token_makes_no_vendor_calls() {
    let mut fx = MinimaxFixture::new().await;
    let submit = fx.submit("t1").expect(0).create_async().await;
    let query = fx
        .query("t1", r#"{"status":"Processing"}"#)
        .expect(0)
        .create_async()
        .await;

    let token = CancellationToken::new();
    token.cancel();
    let err = fx
        .client()
        .synthesize_with_cancel(&request(), &token)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Cancelled);
    submit.assert_async().await;
    query.assert_async().await;
    assert!(fx.uploader.calls().is_empty());
}

#[tokio::test]
async fn test_wrong_shape_status_reply_is_network_kind() {
    let mut fx = MinimaxFixture::new().await;
    let _submit = fx.submit("t1").create_async().await;
    let query = fx
        .query("t1", r#"{"status":1}"#)
        .expect(1)
        .create_async()
        .await;

    let err = fx.client().synthesize(&request()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Network);
    assert!(matches!(err, Error::Protocol { .. }));
    query.assert_async().await;
}
