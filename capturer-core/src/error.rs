//! Error types for Capturer

use thiserror::Error;

/// Result type alias using CapturerError
pub type Result<T> = std::result::Result<T, CapturerError>;

/// Main error type for Capturer operations
#[derive(Debug, Error)]
pub enum CapturerError {
    /// Host could not enumerate capture sources
    #[error("Unknown sources list.")]
    EnumerationFailure,

    /// A required rendering anchor is absent
    #[error("Element of ID: '{0}' does not exists!")]
    MissingAnchor(String),

    /// A click referenced a source that was never offered
    #[error("Source with id: \"{0}\" does not exist!")]
    SourceNotFound(String),

    /// User closed the dialog
    #[error("Permission denied")]
    PermissionDenied,

    /// The dialog already reported its outcome
    #[error("Outcome already sent to host")]
    OutcomeAlreadySent,

    /// The host side of the channel went away
    #[error("Host channel closed")]
    ChannelClosed,

    /// Socket transport error
    #[error("IPC error: {0}")]
    Ipc(String),

    /// Malformed or unexpected message
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<CapturerError>,
    },
}

impl CapturerError {
    /// Create an IPC error
    pub fn ipc(msg: impl Into<String>) -> Self {
        Self::Ipc(msg.into())
    }

    /// Create a protocol error
    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::Protocol(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Innermost error, skipping context layers
    pub fn root(&self) -> &CapturerError {
        match self {
            Self::WithContext { source, .. } => source.root(),
            other => other,
        }
    }

    /// Whether the host channel itself is gone
    ///
    /// Once this is true there is nobody left to report an outcome to.
    pub fn is_disconnect(&self) -> bool {
        matches!(self.root(), Self::ChannelClosed)
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl From<serde_json::Error> for CapturerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Protocol(err.to_string())
    }
}

impl From<toml::de::Error> for CapturerError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(format!("Failed to parse config file: {}", err))
    }
}

impl From<toml::ser::Error> for CapturerError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Config(format!("Failed to serialize config: {}", err))
    }
}
