use crate::config::ChunkerConfig;
use crate::error::Result;
use crate::types::Chunk;
use nfprep_metadata::FeatureTagger;
use std::collections::BTreeSet;

/// Splits text into line-aligned chunks under line and byte limits
#[derive(Debug, Clone)]
pub struct Chunker {
    config: ChunkerConfig,
    tagger: &'static FeatureTagger,
}

/// Lines of the chunk being built, as 0-indexed positions into the text
struct OpenChunk {
    start: usize,
    overlap: usize,
    bytes: usize,
}

impl OpenChunk {
    const fn primary(&self, end: usize) -> usize {
        end - self.start - self.overlap
    }
}

const fn line_cost(line: &str) -> usize {
    line.len() + 1
}

impl Chunker {
    /// Create a chunker, rejecting limits that cannot produce well-formed chunks
    pub fn new(config: ChunkerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            tagger: FeatureTagger::shared(),
        })
    }

    /// Get configuration
    #[must_use]
    pub const fn config(&self) -> &ChunkerConfig {
        &self.config
    }

    /// Chunk `text`.
    ///
    /// A chunk is cut before a line that would push it past `max_bytes`
    /// (once it holds at least one line of its own), or when it reaches
    /// `max_lines` with lines still remaining. Each new chunk starts with
    /// the last `overlap_lines` lines of the previous one, trimmed from the
    /// front until the overlap and the next line fit in `max_bytes`.
    /// Feature changes never force a cut.
    #[must_use]
    pub fn chunk(&self, text: &str) -> Vec<Chunk> {
        let lines: Vec<&str> = text.lines().collect();
        if lines.is_empty() {
            return Vec::new();
        }

        let labels: Vec<Vec<&'static str>> = lines
            .iter()
            .map(|line| self.tagger.tag_line(line).collect())
            .collect();

        let mut chunks = Vec::new();
        let mut open = OpenChunk {
            start: 0,
            overlap: 0,
            bytes: 0,
        };
        let mut end = 0;

        while end < lines.len() {
            let cost = line_cost(lines[end]);
            if open.primary(end) > 0 && open.bytes + cost > self.config.max_bytes {
                chunks.push(self.emit(chunks.len(), &lines, &labels, &open, end));
                open = self.carry_overlap(&lines, end);
                continue;
            }

            open.bytes += cost;
            end += 1;

            if end - open.start >= self.config.max_lines && end < lines.len() {
                chunks.push(self.emit(chunks.len(), &lines, &labels, &open, end));
                open = self.carry_overlap(&lines, end);
            }
        }
        chunks.push(self.emit(chunks.len(), &lines, &labels, &open, end));

        log::debug!(
            "Chunked {} lines into {} chunks (max_lines={}, max_bytes={}, overlap={})",
            lines.len(),
            chunks.len(),
            self.config.max_lines,
            self.config.max_bytes,
            self.config.overlap_lines
        );
        chunks
    }

    /// Open the chunk that follows a cut at `end`
    fn carry_overlap(&self, lines: &[&str], end: usize) -> OpenChunk {
        let next_cost = lines.get(end).map_or(0, |line| line_cost(line));
        let mut start = end.saturating_sub(self.config.overlap_lines);
        let mut bytes: usize = lines[start..end].iter().map(|line| line_cost(line)).sum();
        while start < end && bytes + next_cost > self.config.max_bytes {
            bytes -= line_cost(lines[start]);
            start += 1;
        }
        OpenChunk {
            start,
            overlap: end - start,
            bytes,
        }
    }

    fn emit(
        &self,
        id: usize,
        lines: &[&str],
        labels: &[Vec<&'static str>],
        open: &OpenChunk,
        end: usize,
    ) -> Chunk {
        let content = lines[open.start..end].join("\n");
        let mut feature_tags = BTreeSet::new();
        for line_labels in &labels[open.start..end] {
            feature_tags.extend(line_labels.iter().map(|label| label.to_string()));
        }
        let (overlap_start, overlap_end) = if open.overlap > 0 {
            (Some(open.start + 1), Some(open.start + open.overlap))
        } else {
            (None, None)
        };
        Chunk {
            id,
            start_line: open.start + 1,
            end_line: end,
            byte_size: content.len(),
            content,
            overlap_start,
            overlap_end,
            feature_tags,
        }
    }

    /// Get statistics about chunking
    #[must_use]
    pub fn get_stats(chunks: &[Chunk]) -> ChunkingStats {
        let sizes = chunks.iter().map(|c| c.byte_size);
        ChunkingStats {
            total_chunks: chunks.len(),
            total_lines: chunks.last().map_or(0, |c| c.end_line),
            overlap_lines: chunks.iter().map(Chunk::overlap_len).sum(),
            total_bytes: sizes.clone().sum(),
            avg_bytes_per_chunk: if chunks.is_empty() {
                0
            } else {
                sizes.clone().sum::<usize>() / chunks.len()
            },
            min_bytes: sizes.clone().min().unwrap_or(0),
            max_bytes: sizes.max().unwrap_or(0),
        }
    }
}

impl Default for Chunker {
    fn default() -> Self {
        Self {
            config: ChunkerConfig::default(),
            tagger: FeatureTagger::shared(),
        }
    }
}

/// Chunk `text` with explicit limits
pub fn chunk(
    text: &str,
    max_lines: usize,
    max_bytes: usize,
    overlap_lines: usize,
) -> Result<Vec<Chunk>> {
    let chunker = Chunker::new(ChunkerConfig::new(max_lines, max_bytes, overlap_lines))?;
    Ok(chunker.chunk(text))
}

/// Statistics about chunking results
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct ChunkingStats {
    pub total_chunks: usize,
    pub total_lines: usize,
    /// Lines repeated across chunk boundaries
    pub overlap_lines: usize,
    pub total_bytes: usize,
    pub avg_bytes_per_chunk: usize,
    pub min_bytes: usize,
    pub max_bytes: usize,
}

impl std::fmt::Display for ChunkingStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Chunks: {} | Lines: {} | Overlap: {} | Bytes: {} | Avg: {} | Range: {}-{}",
            self.total_chunks,
            self.total_lines,
            self.overlap_lines,
            self.total_bytes,
            self.avg_bytes_per_chunk,
            self.min_bytes,
            self.max_bytes
        )
    }
}
