//! Base tool trait.

use crate::Result;
use async_trait::async_trait;

/// An invocable tool with a JSON contract.
///
/// Implementations must check `input` against [`Tool::input_schema`] before
/// performing any side effect.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Registry key, unique per process.
    fn id(&self) -> &str;

    /// Tool set this tool belongs to, if any.
    fn tool_set(&self) -> Option<&str> {
        None
    }

    fn description(&self) -> &str;

    fn input_schema(&self) -> &serde_json::Value;

    fn output_schema(&self) -> &serde_json::Value;

    async fn execute(&self, input: serde_json::Value) -> Result<serde_json::Value>;
}
