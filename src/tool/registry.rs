//! Tool registry.

use super::base::Tool;
use super::descriptor::ToolSetDescriptor;
use crate::{Error, ErrorContext, Result};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info};

#[derive(Default)]
pub struct ToolRegistry {
    tool_sets: RwLock<HashMap<String, Arc<ToolSetDescriptor>>>,
    tools: RwLock<HashMap<String, Arc<dyn Tool>>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_tool_set(&self, descriptor: ToolSetDescriptor) -> Result<()> {
        if descriptor.id.trim().is_empty() {
            return Err(registration_error("tool set id must not be empty", "id"));
        }
        if descriptor.name.en().map(str::trim).unwrap_or("").is_empty() {
            return Err(registration_error(
                format!("tool set {} needs an English name", descriptor.id),
                "name.en",
            ));
        }
        let mut sets = self.tool_sets.write().unwrap_or_else(PoisonError::into_inner);
        if sets.contains_key(&descriptor.id) {
            return Err(registration_error(
                format!("tool set {} is already registered", descriptor.id),
                "id",
            ));
        }
        info!(tool_set = %descriptor.id, "registered tool set");
        sets.insert(descriptor.id.clone(), Arc::new(descriptor));
        Ok(())
    }

    pub fn register_tool(&self, tool: Arc<dyn Tool>) -> Result<()> {
        let id = tool.id().to_string();
        if let Some(set) = tool.tool_set() {
            if !self.has_tool_set(set) {
                return Err(registration_error(
                    format!("tool {} references unknown tool set {}", id, set),
                    "tool_set",
                ));
            }
        }
        let mut tools = self.tools.write().unwrap_or_else(PoisonError::into_inner);
        if tools.contains_key(&id) {
            return Err(registration_error(
                format!("tool {} is already registered", id),
                "id",
            ));
        }
        info!(tool = %id, "registered tool");
        tools.insert(id, tool);
        Ok(())
    }

    pub fn tool_set(&self, id: &str) -> Option<Arc<ToolSetDescriptor>> {
        self.tool_sets
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    pub fn has_tool_set(&self, id: &str) -> bool {
        self.tool_sets
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(id)
    }

    pub fn tool(&self, id: &str) -> Option<Arc<dyn Tool>> {
        self.tools
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    /// Tool sets sorted by id.
    pub fn tool_sets(&self) -> Vec<Arc<ToolSetDescriptor>> {
        let mut sets: Vec<_> = self
            .tool_sets
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();
        sets.sort_by(|a, b| a.id.cmp(&b.id));
        sets
    }

    /// Tools sorted by id.
    pub fn tools(&self) -> Vec<Arc<dyn Tool>> {
        let mut tools: Vec<_> = self
            .tools
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();
        tools.sort_by(|a, b| a.id().cmp(b.id()));
        tools
    }

    pub async fn invoke(&self, id: &str, input: serde_json::Value) -> Result<serde_json::Value> {
        let tool = self.tool(id).ok_or_else(|| {
            Error::validation_with_context(
                format!("unknown tool: {}", id),
                ErrorContext::new().with_source("tool_registry"),
            )
        })?;
        debug!(tool = %id, "invoking tool");
        tool.execute(input).await
    }

    pub fn clear(&self) {
        self.tools
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.tool_sets
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

fn registration_error(msg: impl Into<String>, field: &str) -> Error {
    Error::validation_with_context(
        msg,
        ErrorContext::new()
            .with_field_path(field)
            .with_source("tool_registry"),
    )
}

static GLOBAL_REGISTRY: once_cell::sync::Lazy<ToolRegistry> =
    once_cell::sync::Lazy::new(ToolRegistry::new);

pub fn get_tool_registry() -> &'static ToolRegistry {
    &GLOBAL_REGISTRY
}
