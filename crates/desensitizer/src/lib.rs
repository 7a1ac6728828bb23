//! # nfprep Desensitizer
//!
//! Masks sensitive values (secrets, subscriber and device identities, phone
//! numbers, URLs, IP addresses, operator names) in configuration text and
//! returns a reversible per-category mapping.
//!
//! Patterns come from an ordered [`PatternCatalog`]. Every pattern matches the
//! original text; the first category to claim a byte range owns it, so masked
//! output never cascades into another category.
//!
//! ```rust
//! use nfprep_desensitizer::{desensitize, PatternCatalog};
//!
//! let catalog = PatternCatalog::builtin().unwrap();
//! let out = desensitize("password: secret123\nip: 10.1.2.3\n", &catalog);
//! assert_eq!(out.text, "password=********\nip: 10.1.xxx.xxx\n");
//! ```

mod catalog;
mod engine;
mod error;
mod mapping;
mod strategy;

pub use catalog::{PatternCatalog, PatternDef, SensitivePattern};
pub use engine::{desensitize, Desensitized};
pub use error::{DesensitizeError, Result};
pub use mapping::{CategoryMapping, DesensitizeStats, MappingBuilder, ReplacementMapping};
pub use strategy::MaskStrategy;
