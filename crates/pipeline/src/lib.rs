//! # nfprep Pipeline
//!
//! Drives one configuration file through every preparation stage and
//! assembles the per-file result and report. Also runs bounded-concurrency
//! batches over a directory.
//!
//! ## Architecture
//!
//! ```text
//! Raw bytes ──> ConfigDocument (decode + detect)
//!                  │
//!                  ├──> unify_or_fallback ─────────> UnifiedDocument
//!                  ├──> desensitize ───┬───────────> text + mapping
//!                  │                   └──> Chunker ─> Chunk[]
//!                  └──> MetadataExtractor ─────────> Metadata
//!
//! ProcessResult ──> Report (per file) ──> BatchSummary (per run)
//! ```
//!
//! Unify, desensitize and metadata all read the original text. Chunking
//! reads the desensitized text so no chunk carries a raw sensitive value.
//!
//! ## Example
//!
//! ```rust
//! use nfprep_pipeline::{process, ProcessOptions};
//!
//! let options = ProcessOptions::with_builtin_catalog().unwrap();
//! let result = process(b"[amf]\npassword = hunter2\n", "amf.ini", &options);
//! assert!(result.success);
//! assert_eq!(
//!     result.desensitized_text.as_deref(),
//!     Some("[amf]\npassword=********\n")
//! );
//! ```

mod batch;
mod error;
mod limits;
mod options;
mod process;
mod report;
mod settings;

pub use batch::{collect_inputs, process_batch, BatchSummary};
pub use error::{ErrorKind, PipelineError, Result, Stage, StageError};
pub use limits::{batch_concurrency, BATCH_CONCURRENCY_ENV};
pub use options::ProcessOptions;
pub use process::{process, DocumentInfo, ProcessResult, Statistics};
pub use report::Report;
pub use settings::{BatchSection, DesensitizationSection, PipelineSection, Settings};
