//! # nfprep Chunker
//!
//! Size-bounded, line-aligned chunking of (desensitized) configuration text.
//!
//! ## Philosophy
//!
//! Configuration blocks span arbitrary lengths, so boundaries are chosen by
//! size alone:
//! - Every chunk stays under `max_lines` and, unless one line is larger on
//!   its own, under `max_bytes`
//! - Consecutive chunks share `overlap_lines` lines of context
//! - Each chunk is tagged with the network functions and capabilities seen
//!   in it, overlap included
//!
//! ## Architecture
//!
//! ```text
//! Text
//!     │
//!     ├──> Line split + per-line FeatureTagger labels
//!     │
//!     ├──> Boundary scan
//!     │    ├─> byte cut: before a line that would overflow max_bytes
//!     │    ├─> line cut: at max_lines when lines remain
//!     │    └─> carry overlap (trimmed to the byte budget)
//!     │
//!     └──> Chunk[] ──> ChunkIndex / ChunkingStats / merge_chunks
//! ```
//!
//! ## Example
//!
//! ```rust
//! use nfprep_chunker::{Chunker, ChunkerConfig};
//!
//! let chunker = Chunker::new(ChunkerConfig::new(4, 1024, 1)).unwrap();
//! let text: String = (1..=10).map(|i| format!("key{i}: {i}\n")).collect();
//!
//! let chunks = chunker.chunk(&text);
//! for chunk in &chunks {
//!     println!("Chunk {} at lines {}-{}", chunk.id, chunk.start_line, chunk.end_line);
//! }
//! assert_eq!(chunks.len(), 3);
//! ```

mod chunker;
mod config;
mod error;
mod index;
mod types;

pub use chunker::{chunk, Chunker, ChunkingStats};
pub use config::ChunkerConfig;
pub use error::{ChunkerError, Result};
pub use index::{merge_chunks, ChunkIndex, ChunkIndexEntry};
pub use types::Chunk;
