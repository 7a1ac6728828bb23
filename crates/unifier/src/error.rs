use crate::format::FormatTag;
use thiserror::Error;

/// Result type for unifier operations
pub type Result<T> = std::result::Result<T, UnifyError>;

/// Errors raised while reading or unifying a configuration document
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnifyError {
    /// Structured syntax was malformed; callers fall back to text unification
    #[error("{format} parse error: {message}")]
    Parse { format: FormatTag, message: String },

    /// The bytes could not be decoded with any supported encoding
    #[error("Unreadable input: {0}")]
    Unreadable(String),
}

impl UnifyError {
    /// Create a parse error for the given format
    pub fn parse(format: FormatTag, msg: impl Into<String>) -> Self {
        Self::Parse {
            format,
            message: msg.into(),
        }
    }

    /// Create an unreadable input error
    pub fn unreadable(msg: impl Into<String>) -> Self {
        Self::Unreadable(msg.into())
    }

    /// Whether this error must abort the pipeline invocation
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Unreadable(_))
    }
}
