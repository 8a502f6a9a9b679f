//! Moji Weather tool set. Metadata only.

use crate::tool::{I18nText, ToolSetDescriptor, ToolType};
use once_cell::sync::Lazy;

pub const TOOL_SET_ID: &str = "mojiWeather";

pub static MOJI_WEATHER: Lazy<ToolSetDescriptor> = Lazy::new(|| ToolSetDescriptor {
    id: TOOL_SET_ID.to_string(),
    name: I18nText::new()
        .with("zh-CN", "墨迹天气")
        .with("en", "Moji Weather"),
    tool_type: ToolType::Tools,
    description: I18nText::new()
        .with("zh-CN", "墨迹天气工具集，提供天气查询相关功能")
        .with("en", "Moji Weather toolset providing weather query functionality"),
    tool_description: Some(
        "tool description for ai to use, fallback to English description if not provided"
            .to_string(),
    ),
    icon: "/imgs/tools/mojiWeather.svg".to_string(),
});

pub fn descriptor() -> ToolSetDescriptor {
    MOJI_WEATHER.clone()
}
