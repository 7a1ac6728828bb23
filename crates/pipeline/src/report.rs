use crate::error::StageError;
use crate::process::{ProcessResult, Statistics};
use nfprep_chunker::{Chunker, ChunkingStats};
use nfprep_metadata::ComplexityLevel;
use nfprep_unifier::{FormatTag, TextEncoding};
use serde::Serialize;

/// Per-file summary combining every stage's statistics
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub filename: String,
    pub success: bool,
    pub format: Option<FormatTag>,
    pub encoding: Option<TextEncoding>,
    /// Unification fell back to text
    pub degraded: bool,
    pub statistics: Statistics,
    pub errors: Vec<StageError>,
    pub network_functions: Vec<String>,
    pub features: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complexity: Option<ComplexityLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunking: Option<ChunkingStats>,
    pub processing_time_ms: u64,
}

impl Report {
    pub fn from_result(result: &ProcessResult) -> Self {
        let metadata = result.metadata.as_ref();
        Self {
            filename: result.filename.clone(),
            success: result.success,
            format: result.document.as_ref().map(|d| d.format),
            encoding: result.document.as_ref().map(|d| d.encoding),
            degraded: result.unified.as_ref().is_some_and(|u| u.degraded),
            statistics: result.statistics.clone(),
            errors: result.errors.clone(),
            network_functions: metadata
                .map(|m| m.network_functions.keys().cloned().collect())
                .unwrap_or_default(),
            features: metadata
                .map(|m| m.features.iter().cloned().collect())
                .unwrap_or_default(),
            complexity: metadata.map(|m| m.complexity.level),
            chunking: result.chunks.as_deref().map(Chunker::get_stats),
            processing_time_ms: result.processing_time_ms,
        }
    }
}
