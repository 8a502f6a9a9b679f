//! Tool invocation through the registry, with vendor and storage both mocked

use super::mock_server::{MinimaxFixture, API_KEY};
use ai_tool_plugins::packages::{self, minimax_tts};
use ai_tool_plugins::{ErrorKind, PluginConfig, ToolRegistry};
use mockito::Matcher;
use serde_json::{json, Value};

fn input() -> Value {
    json!({
        "apiKey": API_KEY,
        "text": "你好",
        "model": "speech-02-hd",
        "voice_setting": {
            "voice_id": "female-shaonv",
            "speed": 1.0,
            "vol": 1.0,
            "pitch": 0,
            "emotion": "happy",
            "en_normalization": false
        }
    })
}

fn registry_for(fx: &MinimaxFixture) -> ToolRegistry {
    let yaml = format!(
        "minimax:\n  base_url: {url}\n  poll_interval_ms: 0\nupload:\n  endpoint: {url}/upload\n  token: store-token\n",
        url = fx.server.url()
    );
    let config = PluginConfig::from_yaml_str(&yaml).unwrap();
    let registry = ToolRegistry::new();
    packages::register_builtin(&registry, &config).unwrap();
    registry
}

#[tokio::test]
async fn test_invoke_returns_hosted_audio_url() {
    let mut fx = MinimaxFixture::new().await;
    let _submit = fx.submit("t1").create_async().await;
    let _query = fx
        .query("t1", r#"{"status":"Success","file_id":"f1"}"#)
        .create_async()
        .await;
    let _retrieve = fx.retrieve("f1", b"ID3audio").create_async().await;
    let upload = fx
        .server
        .mock("POST", "/upload")
        .match_header("authorization", "Bearer store-token")
        .match_body(Matcher::Regex(r#"filename="minimax_tts.mp3""#.to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"accessUrl":"https://files.example/minimax_tts.mp3"}"#)
        .expect(1)
        .create_async()
        .await;

    let registry = registry_for(&fx);
    let out = registry.invoke(minimax_tts::TOOL_ID, input()).await.unwrap();

    assert_eq!(
        out,
        json!({"audioUrl": "https://files.example/minimax_tts.mp3"})
    );
    upload.assert_async().await;
}

#[tokio::test]
async fn test_invoke_failure_is_prefixed_and_tagged() {
    let mut fx = MinimaxFixture::new().await;
    let _submit = fx.submit("t1").create_async().await;
    let _query = fx
        .query("t1", r#"{"status":"Failed"}"#)
        .create_async()
        .await;
    let upload = fx
        .server
        .mock("POST", "/upload")
        .expect(0)
        .create_async()
        .await;

    let registry = registry_for(&fx);
    let err = registry
        .invoke(minimax_tts::TOOL_ID, input())
        .await
        .unwrap_err();

    assert!(err.to_string().starts_with("TTS failed: "));
    assert_eq!(err.kind(), ErrorKind::VendorTaskFailure);
    upload.assert_async().await;
}

#[tokio::test]
async fn test_invoke_rejects_schema_violation_before_network() {
    let mut fx = MinimaxFixture::new().await;
    let submit = fx.submit("t1").expect(0).create_async().await;

    let mut bad = input();
    bad["text"] = json!("");
    let registry = registry_for(&fx);
    let err = registry
        .invoke(minimax_tts::TOOL_ID, bad)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(err.to_string().starts_with("TTS failed: "));
    submit.assert_async().await;
}

#[tokio::test]
async fn test_storage_rejection_surfaces_as_upload_error() {
    let mut fx = MinimaxFixture::new().await;
    let _submit = fx.submit("t1").create_async().await;
    let _query = fx
        .query("t1", r#"{"status":"Success","file_id":"f1"}"#)
        .create_async()
        .await;
    let _retrieve = fx.retrieve("f1", b"ID3").create_async().await;
    let _upload = fx
        .server
        .mock("POST", "/upload")
        .with_status(503)
        .with_body("maintenance")
        .create_async()
        .await;

    let registry = registry_for(&fx);
    let err = registry
        .invoke(minimax_tts::TOOL_ID, input())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Upload);
}
