use crate::error::Result;
use nfprep_chunker::ChunkerConfig;
use nfprep_desensitizer::PatternCatalog;
use nfprep_metadata::MetadataConfig;
use std::sync::Arc;

/// What one `process` call should produce
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    pub desensitize: bool,
    pub unify_format: bool,
    pub chunk: bool,
    pub extract_metadata: bool,
    pub chunking: ChunkerConfig,
    pub metadata: MetadataConfig,
    /// Compiled once, shared read-only by every invocation
    pub catalog: Arc<PatternCatalog>,
}

impl ProcessOptions {
    /// All stages enabled with default limits
    pub fn new(catalog: Arc<PatternCatalog>) -> Self {
        Self {
            desensitize: true,
            unify_format: true,
            chunk: true,
            extract_metadata: true,
            chunking: ChunkerConfig::default(),
            metadata: MetadataConfig::default(),
            catalog,
        }
    }

    /// All stages enabled, using the built-in pattern catalog
    pub fn with_builtin_catalog() -> Result<Self> {
        Ok(Self::new(Arc::new(PatternCatalog::builtin()?)))
    }

    #[must_use]
    pub fn chunking(mut self, chunking: ChunkerConfig) -> Self {
        self.chunking = chunking;
        self
    }

    #[must_use]
    pub fn only_desensitize(mut self) -> Self {
        self.unify_format = false;
        self.chunk = false;
        self.extract_metadata = false;
        self
    }
}
