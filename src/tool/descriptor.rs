//! Tool-set metadata.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const FALLBACK_LOCALE: &str = "en";

/// Text keyed by locale tag (`en`, `zh-CN`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct I18nText(BTreeMap<String, String>);

impl I18nText {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, locale: impl Into<String>, text: impl Into<String>) -> Self {
        self.0.insert(locale.into(), text.into());
        self
    }

    /// Text for `locale`, falling back to English.
    pub fn get(&self, locale: &str) -> Option<&str> {
        self.0
            .get(locale)
            .or_else(|| self.0.get(FALLBACK_LOCALE))
            .map(String::as_str)
    }

    pub fn en(&self) -> Option<&str> {
        self.0.get(FALLBACK_LOCALE).map(String::as_str)
    }

    pub fn locales(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Catalog classification of a tool set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolType {
    Tools,
    Search,
    Multimodal,
    Communication,
    Finance,
    Design,
    Productivity,
    News,
    Entertainment,
    Social,
    Scientific,
    Other,
}

impl ToolType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tools => "tools",
            Self::Search => "search",
            Self::Multimodal => "multimodal",
            Self::Communication => "communication",
            Self::Finance => "finance",
            Self::Design => "design",
            Self::Productivity => "productivity",
            Self::News => "news",
            Self::Entertainment => "entertainment",
            Self::Social => "social",
            Self::Scientific => "scientific",
            Self::Other => "other",
        }
    }
}

/// Display metadata for a collection of tools. Carries no behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolSetDescriptor {
    pub id: String,
    pub name: I18nText,
    #[serde(rename = "type")]
    pub tool_type: ToolType,
    pub description: I18nText,
    /// Description shown to the model; falls back to the English description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_description: Option<String>,
    pub icon: String,
}

impl ToolSetDescriptor {
    pub fn ai_description(&self) -> Option<&str> {
        self.tool_description
            .as_deref()
            .or_else(|| self.description.en())
    }
}
