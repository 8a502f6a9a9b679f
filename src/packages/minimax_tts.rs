//! MiniMax TTS tool: JSON in, `{ "audioUrl": ... }` out.

use crate::schema::{json_schema_for, SchemaValidator};
use crate::tool::{I18nText, Tool, ToolSetDescriptor, ToolType};
use crate::tts::{MinimaxTtsClient, TtsOutput, TtsRequest};
use crate::{Error, Result};
use async_trait::async_trait;

pub const TOOL_ID: &str = "minimaxTTS";
pub const TOOL_SET_ID: &str = "minimax";

/// Prefix of every failure surfaced by [`MinimaxTtsTool::execute`].
const FAILURE_LABEL: &str = "TTS";

pub fn tool_set() -> ToolSetDescriptor {
    ToolSetDescriptor {
        id: TOOL_SET_ID.to_string(),
        name: I18nText::new().with("zh-CN", "MiniMax").with("en", "MiniMax"),
        tool_type: ToolType::Multimodal,
        description: I18nText::new()
            .with("zh-CN", "MiniMax 语音合成，将文本转换为音频文件")
            .with("en", "MiniMax speech synthesis turning text into an audio file"),
        tool_description: None,
        icon: "/imgs/tools/minimax.svg".to_string(),
    }
}

pub struct MinimaxTtsTool {
    client: MinimaxTtsClient,
    input: SchemaValidator,
    output_schema: serde_json::Value,
}

impl MinimaxTtsTool {
    pub fn new(client: MinimaxTtsClient) -> Result<Self> {
        Ok(Self {
            client,
            input: SchemaValidator::for_type::<TtsRequest>()?,
            output_schema: json_schema_for::<TtsOutput>(),
        })
    }

    async fn run(&self, input: serde_json::Value) -> Result<serde_json::Value> {
        self.input.validate(&input)?;
        let request: TtsRequest = serde_json::from_value(input)
            .map_err(|e| Error::validation(format!("invalid input: {}", e)))?;
        let output = self.client.synthesize(&request).await?;
        Ok(serde_json::to_value(output)?)
    }
}

#[async_trait]
impl Tool for MinimaxTtsTool {
    fn id(&self) -> &str {
        TOOL_ID
    }

    fn tool_set(&self) -> Option<&str> {
        Some(TOOL_SET_ID)
    }

    fn description(&self) -> &str {
        "Convert text to speech with MiniMax and return a URL to the generated MP3"
    }

    fn input_schema(&self) -> &serde_json::Value {
        self.input.schema()
    }

    fn output_schema(&self) -> &serde_json::Value {
        &self.output_schema
    }

    async fn execute(&self, input: serde_json::Value) -> Result<serde_json::Value> {
        self.run(input)
            .await
            .map_err(|e| Error::tool_failed(FAILURE_LABEL, e))
    }
}
