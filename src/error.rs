use crate::transport::TransportError;
use thiserror::Error;

/// Structured error context for better error handling and debugging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Field path that caused the error (e.g., "voice_setting.voice_id", "minimax.base_url")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., expected type, actual value)
    pub details: Option<String>,
    /// Source of the error (e.g., "schema_validator", "minimax_tts")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self {
            field_path: None,
            details: None,
            source: None,
        }
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Coarse classification of an [`Error`], stable across wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed input, rejected before any network call.
    Validation,
    /// Transport failure or malformed vendor response.
    Network,
    /// The vendor reported the synthesis job as failed.
    VendorTaskFailure,
    /// The job never reached a terminal state within the poll budget.
    PollTimeout,
    /// Re-hosting the artifact failed.
    Upload,
    /// The caller cancelled the operation.
    Cancelled,
    /// Invalid local configuration.
    Configuration,
    /// Anything else (serialization, I/O).
    Internal,
}

/// Unified error type for tool packages.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Validation error: {message}{}", format_context(.context))]
    Validation {
        message: String,
        context: ErrorContext,
    },

    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("Network transport error: {0}")]
    Network(#[from] TransportError),

    #[error("Malformed vendor response: {message}{}", format_context(.context))]
    Protocol {
        message: String,
        context: ErrorContext,
    },

    #[error("Vendor task failed: {message}")]
    VendorTaskFailure { message: String },

    #[error("Task timeout: no terminal status after {attempts} status queries")]
    PollTimeout { attempts: u32 },

    #[error("Upload failed: {message}{}", format_context(.context))]
    Upload {
        message: String,
        context: ErrorContext,
    },

    #[error("Operation cancelled")]
    Cancelled,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Top-level failure of a tool invocation. The message embeds the original cause.
    #[error("{tool} failed: {source}")]
    ToolFailed {
        tool: String,
        #[source]
        source: Box<Error>,
    },
}

// Helper function to format error context for display
fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl Error {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::validation_with_context(msg, ErrorContext::new())
    }

    /// Create a new validation error with structured context
    pub fn validation_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Validation {
            message: msg.into(),
            context,
        }
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::configuration_with_context(msg, ErrorContext::new())
    }

    /// Create a new configuration error with structured context
    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    pub fn protocol_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Protocol {
            message: msg.into(),
            context,
        }
    }

    pub fn vendor_task_failure(msg: impl Into<String>) -> Self {
        Error::VendorTaskFailure {
            message: msg.into(),
        }
    }

    pub fn upload(msg: impl Into<String>) -> Self {
        Self::upload_with_context(msg, ErrorContext::new())
    }

    pub fn upload_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Upload {
            message: msg.into(),
            context,
        }
    }

    /// Wrap `self` as the top-level failure of `tool`.
    pub fn tool_failed(tool: impl Into<String>, source: Error) -> Self {
        Error::ToolFailed {
            tool: tool.into(),
            source: Box::new(source),
        }
    }

    /// Classify the error. Wrapped errors report the kind of their cause.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation { .. } => ErrorKind::Validation,
            Error::Configuration { .. } => ErrorKind::Configuration,
            Error::Network(_) | Error::Protocol { .. } => ErrorKind::Network,
            Error::VendorTaskFailure { .. } => ErrorKind::VendorTaskFailure,
            Error::PollTimeout { .. } => ErrorKind::PollTimeout,
            Error::Upload { .. } => ErrorKind::Upload,
            Error::Cancelled => ErrorKind::Cancelled,
            Error::Io(_) | Error::Serialization(_) => ErrorKind::Internal,
            Error::ToolFailed { source, .. } => source.kind(),
        }
    }

    /// Whether retrying the whole operation may succeed.
    ///
    /// Transport failures and timeouts are worth another try; a job the vendor
    /// rejected or input that failed validation is not.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Network(e) => e.is_transient(),
            Error::PollTimeout { .. } | Error::Upload { .. } => true,
            Error::ToolFailed { source, .. } => source.is_retryable(),
            _ => false,
        }
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Configuration { context, .. }
            | Error::Validation { context, .. }
            | Error::Protocol { context, .. }
            | Error::Upload { context, .. } => Some(context),
            Error::ToolFailed { source, .. } => source.context(),
            _ => None,
        }
    }
}
