//! # nfprep Metadata
//!
//! Single-pass extraction of 5GC domain entities from configuration text:
//! network-function occurrences, capability features, interfaces,
//! identifiers, network endpoints, file statistics and a complexity score.
//!
//! [`FeatureTagger`] is the per-line label detector shared with the chunker,
//! so chunk tags and document features use one vocabulary.
//!
//! ```rust
//! use nfprep_metadata::extract;
//!
//! let meta = extract("amf01:\n  peer: smf01\n  pdu session: on\n");
//! assert_eq!(meta.network_functions["AMF"].count, 1);
//! assert!(meta.features.contains("session"));
//! ```

mod catalog;
mod complexity;
mod extractor;
mod network;
mod stats;
mod tagger;
mod types;

pub use catalog::{FEATURE_GROUPS, NETWORK_FUNCTIONS};
pub use complexity::assess;
pub use extractor::{extract, MetadataConfig, MetadataExtractor};
pub use stats::file_statistics;
pub use tagger::FeatureTagger;
pub use types::{
    Complexity, ComplexityLevel, FileStatistics, IpSummary, Metadata, NetworkFunctionStats,
    NetworkInfo, ProjectInfo,
};
