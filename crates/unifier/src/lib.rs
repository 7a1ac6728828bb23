//! # nfprep Unifier
//!
//! Decodes configuration files produced by core-network elements, classifies
//! their format and parses them into one format-independent tree with a
//! path-to-line index.
//!
//! ## Architecture
//!
//! ```text
//! Raw bytes
//!     │
//!     ├──> decode (UTF-8 / UTF-16 BOM / GBK) → ConfigDocument
//!     │
//!     ├──> detect (extension, then first 1 KiB) → FormatTag
//!     │
//!     └──> UnifyStrategy for the tag
//!          ├─> native parse (roxmltree / serde_json / serde_yaml / INI)
//!          ├─> line attribution (parser positions or LineLocator)
//!          └─> UnifiedDocument { root, line_map }
//!                 (parse failure → text fallback, degraded = true)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use nfprep_unifier::{unify, FormatTag};
//!
//! let doc = unify("amf:\n  name: amf01\n", FormatTag::Yaml).unwrap();
//! assert_eq!(doc.line_map.get("amf.name"), Some(2));
//! ```

mod document;
mod error;
mod format;
mod input;
mod locate;
mod node;
mod strategy;

pub use document::{unify, unify_or_fallback, UnifiedDocument};
pub use error::{Result, UnifyError};
pub use format::{detect, detect_text, Detection, DetectionMethod, FormatTag, SNIFF_BYTES};
pub use input::{decode, line_count, ConfigDocument, TextEncoding};
pub use node::{child_path, LineMap, Scalar, UnifiedNode, ValueType};
pub use strategy::{strategy_for, UnifyStrategy};
