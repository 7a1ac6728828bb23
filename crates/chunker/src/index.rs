use crate::types::Chunk;
use serde::{Deserialize, Serialize};

/// One row of a [`ChunkIndex`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkIndexEntry {
    pub id: usize,
    /// `start-end`, 1-indexed and inclusive
    pub lines: String,
    pub features: Vec<String>,
    pub size: usize,
}

/// Compact listing of a chunk set, written next to the chunk files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkIndex {
    pub total_chunks: usize,
    pub total_lines: usize,
    pub chunks: Vec<ChunkIndexEntry>,
}

impl ChunkIndex {
    #[must_use]
    pub fn build(chunks: &[Chunk]) -> Self {
        Self {
            total_chunks: chunks.len(),
            total_lines: chunks.iter().map(|c| c.end_line).max().unwrap_or(0),
            chunks: chunks
                .iter()
                .map(|c| ChunkIndexEntry {
                    id: c.id,
                    lines: format!("{}-{}", c.start_line, c.end_line),
                    features: c.feature_tags.iter().cloned().collect(),
                    size: c.byte_size,
                })
                .collect(),
        }
    }
}

/// Reassemble the chunked text, dropping every line an earlier chunk
/// already contributed. The result has no trailing newline.
#[must_use]
pub fn merge_chunks(chunks: &[Chunk]) -> String {
    let mut ordered: Vec<&Chunk> = chunks.iter().collect();
    ordered.sort_by_key(|c| c.id);

    let mut merged: Vec<&str> = Vec::new();
    let mut last_end: usize = 0;
    for chunk in ordered {
        let skip = (last_end + 1).saturating_sub(chunk.start_line);
        merged.extend(chunk.content.split('\n').skip(skip));
        last_end = last_end.max(chunk.end_line);
    }
    merged.join("\n")
}
