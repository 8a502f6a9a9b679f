//! Built-in tool packages.

pub mod minimax_tts;
pub mod moji_weather;

use crate::config::PluginConfig;
use crate::tool::ToolRegistry;
use crate::tts::MinimaxTtsClient;
use crate::upload::HttpUploader;
use crate::Result;
use std::sync::Arc;
use tracing::warn;

/// Register every built-in tool set, plus the tools `config` makes usable.
///
/// The TTS tool needs an upload endpoint; without one only its tool set is
/// registered.
pub fn register_builtin(registry: &ToolRegistry, config: &PluginConfig) -> Result<()> {
    config.validate()?;
    registry.register_tool_set(moji_weather::descriptor())?;
    registry.register_tool_set(minimax_tts::tool_set())?;

    if config.upload.endpoint.is_none() {
        warn!(
            tool = minimax_tts::TOOL_ID,
            "upload endpoint not configured; tool disabled"
        );
        return Ok(());
    }
    let uploader = Arc::new(HttpUploader::from_config(&config.upload)?);
    let client = MinimaxTtsClient::builder()
        .config(config)
        .uploader(uploader)
        .build()?;
    registry.register_tool(Arc::new(minimax_tts::MinimaxTtsTool::new(client)?))?;
    Ok(())
}
