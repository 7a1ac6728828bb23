use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A bounded, line-aligned slice of a text
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chunk {
    /// Sequential id starting at 0
    pub id: usize,

    /// Start line (1-indexed), overlap included
    pub start_line: usize,

    /// End line (1-indexed, inclusive)
    pub end_line: usize,

    /// Lines `start_line..=end_line` joined with `\n`
    pub content: String,

    /// First line repeated from the previous chunk
    pub overlap_start: Option<usize>,

    /// Last line repeated from the previous chunk
    pub overlap_end: Option<usize>,

    /// Network-function and capability labels seen in the chunk
    pub feature_tags: BTreeSet<String>,

    /// Size of `content` in bytes
    pub byte_size: usize,
}

impl Chunk {
    /// Get the number of lines in this chunk
    #[must_use]
    pub const fn line_count(&self) -> usize {
        self.end_line.saturating_sub(self.start_line) + 1
    }

    /// Check if chunk contains a specific line
    #[must_use]
    pub const fn contains_line(&self, line: usize) -> bool {
        line >= self.start_line && line <= self.end_line
    }

    #[must_use]
    pub const fn has_overlap(&self) -> bool {
        self.overlap_start.is_some()
    }

    /// Number of lines repeated from the previous chunk
    #[must_use]
    pub fn overlap_len(&self) -> usize {
        match (self.overlap_start, self.overlap_end) {
            (Some(start), Some(end)) if end >= start => end - start + 1,
            _ => 0,
        }
    }

    /// First line that no earlier chunk contains
    #[must_use]
    pub fn primary_start(&self) -> usize {
        self.start_line + self.overlap_len()
    }
}
