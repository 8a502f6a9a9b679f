//! TTS request/response types and MiniMax wire shapes.

use crate::{Error, ErrorContext, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Caller-controlled voice parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct VoiceSetting {
    pub voice_id: String,
    pub speed: f64,
    pub vol: f64,
    pub pitch: f64,
    pub emotion: String,
    pub en_normalization: bool,
}

/// Input of a synthesis call. Every field is required.
#[derive(Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TtsRequest {
    #[serde(rename = "apiKey")]
    pub api_key: String,
    #[schemars(length(min = 1))]
    pub text: String,
    #[schemars(length(min = 1))]
    pub model: String,
    pub voice_setting: VoiceSetting,
}

impl std::fmt::Debug for TtsRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtsRequest")
            .field("api_key", &"<redacted>")
            .field("text", &self.text)
            .field("model", &self.model)
            .field("voice_setting", &self.voice_setting)
            .finish()
    }
}

impl TtsRequest {
    /// Checks the constraints the input schema expresses, for callers that
    /// build the request in Rust instead of going through JSON.
    pub fn validate(&self) -> Result<()> {
        if self.text.is_empty() {
            return Err(invalid("text must not be empty", "text"));
        }
        if self.model.is_empty() {
            return Err(invalid("model must not be empty", "model"));
        }
        let v = &self.voice_setting;
        for (name, value) in [("speed", v.speed), ("vol", v.vol), ("pitch", v.pitch)] {
            if !value.is_finite() {
                return Err(invalid(
                    format!("{} must be a finite number", name),
                    &format!("voice_setting.{}", name),
                ));
            }
        }
        Ok(())
    }
}

fn invalid(msg: impl Into<String>, field: &str) -> Error {
    Error::validation_with_context(
        msg,
        ErrorContext::new()
            .with_field_path(field)
            .with_source("tts_request"),
    )
}

/// Result of a synthesis call: only the re-hosted URL crosses the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TtsOutput {
    #[serde(rename = "audioUrl")]
    pub audio_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PronunciationDict {
    pub tone: [&'static str; 0],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AudioSetting {
    pub audio_sample_rate: u32,
    pub bitrate: u32,
    pub format: &'static str,
    pub channel: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VoiceModify {
    pub pitch: i32,
    pub intensity: i32,
    pub timbre: i32,
    pub sound_effects: &'static str,
}

/// Advanced parameters sent with every job. Not exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AdvancedSettings {
    pub language_boost: &'static str,
    pub pronunciation_dict: PronunciationDict,
    pub audio_setting: AudioSetting,
    pub voice_modify: VoiceModify,
}

pub const ADVANCED_SETTINGS: AdvancedSettings = AdvancedSettings {
    language_boost: "auto",
    pronunciation_dict: PronunciationDict { tone: [] },
    audio_setting: AudioSetting {
        audio_sample_rate: 32_000,
        bitrate: 128_000,
        format: "mp3",
        channel: 2,
    },
    voice_modify: VoiceModify {
        pitch: 0,
        intensity: 0,
        timbre: 0,
        sound_effects: "spacious_echo",
    },
};

/// Body of `POST /t2a_async_v2`.
#[derive(Debug, Serialize)]
pub(crate) struct SubmitTaskBody<'a> {
    pub model: &'a str,
    pub text: &'a str,
    pub voice_setting: &'a VoiceSetting,
    #[serde(flatten)]
    pub advanced: AdvancedSettings,
}

impl<'a> SubmitTaskBody<'a> {
    pub fn new(request: &'a TtsRequest) -> Self {
        Self {
            model: &request.model,
            text: &request.text,
            voice_setting: &request.voice_setting,
            advanced: ADVANCED_SETTINGS,
        }
    }
}

/// Vendor status envelope; a non-zero code means the call was rejected.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct BaseResp {
    #[serde(default)]
    pub status_code: i64,
    #[serde(default)]
    pub status_msg: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct SubmitResponse {
    #[serde(default)]
    pub task_id: Option<serde_json::Value>,
    #[serde(default)]
    pub base_resp: Option<BaseResp>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct QueryResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub file_id: Option<serde_json::Value>,
    #[serde(default)]
    pub base_resp: Option<BaseResp>,
}

/// Observed state of a synthesis job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskStatus {
    Success { file_id: String },
    Failed,
    /// Any other status string, kept for logging.
    Pending(String),
}

/// Vendor ids arrive as either JSON strings or integers.
pub(crate) fn id_to_string(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
