//! # ai-tool-plugins
//!
//! 面向 AI 工具插件框架的工具包：MiniMax 异步语音合成（结果转存到内部存储），以及工具集描述。
//!
//! Tool packages for AI agent platforms.
//!
//! ## Overview
//!
//! Each package plugs into a host tool framework through a small contract: a
//! JSON Schema for input and output, and an async `execute`. Input is checked
//! against the schema before any side effect occurs.
//!
//! ## Packages
//!
//! - **MiniMax TTS** ([`packages::minimax_tts`]): submits an asynchronous
//!   synthesis job, polls it until it succeeds or fails, downloads the audio
//!   and re-hosts it through an [`upload::Uploader`], returning only the public URL.
//! - **Moji Weather** ([`packages::moji_weather`]): tool-set metadata.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ai_tool_plugins::tts::{MinimaxTtsClient, TtsRequest, VoiceSetting};
//! use ai_tool_plugins::upload::HttpUploader;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> ai_tool_plugins::Result<()> {
//!     let uploader = HttpUploader::new("http://storage.local/upload", None, Duration::from_secs(30))?;
//!     let client = MinimaxTtsClient::builder()
//!         .uploader(Arc::new(uploader))
//!         .build()?;
//!
//!     let out = client
//!         .synthesize(&TtsRequest {
//!             api_key: "your-api-key".into(),
//!             text: "Hello".into(),
//!             model: "speech-02-hd".into(),
//!             voice_setting: VoiceSetting {
//!                 voice_id: "male-qn-qingse".into(),
//!                 speed: 1.0,
//!                 vol: 1.0,
//!                 pitch: 0.0,
//!                 emotion: "happy".into(),
//!                 en_normalization: false,
//!             },
//!         })
//!         .await?;
//!     println!("{}", out.audio_url);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`tts`] | MiniMax async TTS client and poll loop |
//! | [`packages`] | Built-in tools and tool sets |
//! | [`tool`] | Tool trait, tool-set descriptors, registry |
//! | [`schema`] | JSON Schema generation and validation |
//! | [`upload`] | Artifact re-hosting |
//! | [`transport`] | Bearer-authenticated HTTP transport |
//! | [`config`] | YAML/env configuration |

pub mod config;
pub mod packages;
pub mod schema;
pub mod tool;
pub mod transport;
pub mod tts;
pub mod upload;

pub use config::PluginConfig;
pub use tool::{get_tool_registry, Tool, ToolRegistry, ToolSetDescriptor};
pub use tts::{MinimaxTtsClient, TtsOutput, TtsRequest};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext, ErrorKind};
