use nfprep_chunker::ChunkerError;
use nfprep_desensitizer::DesensitizeError;
use nfprep_unifier::UnifyError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

/// Pipeline stage an error is attributed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Settings,
    Read,
    Decode,
    Detect,
    Catalog,
    Unify,
    Desensitize,
    Metadata,
    Chunk,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Settings => "settings",
            Stage::Read => "read",
            Stage::Decode => "decode",
            Stage::Detect => "detect",
            Stage::Catalog => "catalog",
            Stage::Unify => "unify",
            Stage::Desensitize => "desensitize",
            Stage::Metadata => "metadata",
            Stage::Chunk => "chunk",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error classification shared by every stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Conflicting format signals; the document is treated as text
    FormatDetectionAmbiguous,
    /// Malformed structured syntax; unification fell back to text
    ParseError,
    /// Invalid sensitive-pattern catalog
    PatternCompilationError,
    /// Chunk limits that cannot produce well-formed chunks
    ChunkingConfigError,
    /// Bytes that no supported encoding decodes, or a file that cannot be read
    UnreadableInputError,
    /// Malformed settings file
    InvalidSettings,
}

impl ErrorKind {
    /// Fatal kinds abort the invocation and clear `success`
    #[must_use]
    pub const fn is_fatal(self) -> bool {
        !matches!(self, Self::FormatDetectionAmbiguous | Self::ParseError)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// One entry of a result's error list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageError {
    pub stage: Stage,
    pub kind: ErrorKind,
    pub message: String,
}

impl StageError {
    pub fn new(stage: Stage, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            stage,
            kind,
            message: message.into(),
        }
    }

    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        self.kind.is_fatal()
    }
}

impl fmt::Display for StageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.stage, self.kind, self.message)
    }
}

impl From<&PipelineError> for StageError {
    fn from(err: &PipelineError) -> Self {
        StageError::new(err.stage(), err.kind(), err.to_string())
    }
}

/// Setup failures raised before or around per-file processing
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Invalid settings: {0}")]
    Settings(#[from] toml::de::Error),

    #[error("Pattern catalog error: {0}")]
    Catalog(#[from] DesensitizeError),

    #[error(transparent)]
    ChunkConfig(#[from] ChunkerError),

    #[error(transparent)]
    Unify(#[from] UnifyError),

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid input pattern: {0}")]
    Glob(#[from] globset::Error),
}

impl PipelineError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::Settings(_) | PipelineError::Glob(_) => ErrorKind::InvalidSettings,
            PipelineError::Catalog(_) => ErrorKind::PatternCompilationError,
            PipelineError::ChunkConfig(_) => ErrorKind::ChunkingConfigError,
            PipelineError::Unify(err) if !err.is_fatal() => ErrorKind::ParseError,
            PipelineError::Unify(_) | PipelineError::Io { .. } => ErrorKind::UnreadableInputError,
        }
    }

    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::Settings(_) | PipelineError::Glob(_) => Stage::Settings,
            PipelineError::Catalog(_) => Stage::Catalog,
            PipelineError::ChunkConfig(_) => Stage::Chunk,
            PipelineError::Unify(err) if !err.is_fatal() => Stage::Unify,
            PipelineError::Unify(_) => Stage::Decode,
            PipelineError::Io { .. } => Stage::Read,
        }
    }
}
