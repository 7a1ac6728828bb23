use thiserror::Error;

/// Result type for desensitization operations
pub type Result<T> = std::result::Result<T, DesensitizeError>;

/// Errors raised while loading a pattern catalog. Masking itself cannot fail.
#[derive(Error, Debug)]
pub enum DesensitizeError {
    /// A pattern's regular expression does not compile
    #[error("Pattern `{name}` failed to compile: {source}")]
    PatternCompilation {
        name: String,
        #[source]
        source: regex::Error,
    },

    /// A pattern entry is structurally invalid
    #[error("Pattern `{name}` is invalid: {reason}")]
    InvalidPattern { name: String, reason: String },

    /// Catalog document is not valid TOML for the schema
    #[error("Catalog parse error: {0}")]
    Catalog(#[from] toml::de::Error),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DesensitizeError {
    /// Create an invalid pattern error
    pub fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPattern {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
