//! TTS（文字转语音）模块：提交 MiniMax 异步合成任务，轮询至完成，下载音频并转存。
//!
//! MiniMax asynchronous text-to-speech: submit a job, poll it until terminal,
//! download the audio and re-host it on internal storage.

mod client;
mod poll;
mod types;

pub use client::{MinimaxTtsClient, MinimaxTtsClientBuilder, DEFAULT_FILENAME};
pub use poll::PollPolicy;
pub use types::{
    AdvancedSettings, AudioSetting, PronunciationDict, TaskStatus, TtsOutput, TtsRequest,
    VoiceModify, VoiceSetting, ADVANCED_SETTINGS,
};
