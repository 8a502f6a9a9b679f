//! Tool framework: tool-set descriptors, the [`Tool`] trait and the registry
//! the host consults at startup.

mod base;
mod descriptor;
mod registry;

pub use base::Tool;
pub use descriptor::{I18nText, ToolSetDescriptor, ToolType, FALLBACK_LOCALE};
pub use registry::{get_tool_registry, ToolRegistry};
