use crate::error::{PipelineError, Result};
use crate::options::ProcessOptions;
use nfprep_chunker::ChunkerConfig;
use nfprep_desensitizer::{PatternCatalog, PatternDef};
use nfprep_metadata::MetadataConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

const fn default_true() -> bool {
    true
}

fn default_input_pattern() -> String {
    "*".to_string()
}

/// `[pipeline]`: which stages run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineSection {
    #[serde(default = "default_true")]
    pub desensitize: bool,
    #[serde(default = "default_true")]
    pub unify_format: bool,
    #[serde(default = "default_true")]
    pub chunk: bool,
    #[serde(default = "default_true")]
    pub extract_metadata: bool,
}

impl Default for PipelineSection {
    fn default() -> Self {
        Self {
            desensitize: true,
            unify_format: true,
            chunk: true,
            extract_metadata: true,
        }
    }
}

/// `[desensitization]`: catalog composition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesensitizationSection {
    /// Start from the built-in catalog
    #[serde(default = "default_true")]
    pub builtin: bool,
    /// Built-in categories to leave out
    #[serde(default)]
    pub disable: Vec<String>,
    /// Extra entries, applied after the built-ins
    #[serde(default)]
    pub patterns: Vec<PatternDef>,
}

impl Default for DesensitizationSection {
    fn default() -> Self {
        Self {
            builtin: true,
            disable: Vec::new(),
            patterns: Vec::new(),
        }
    }
}

/// `[batch]`: directory processing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSection {
    /// Files processed at once; falls back to the environment, then the CPU count
    #[serde(default)]
    pub concurrency: Option<usize>,
    /// File-name glob
    #[serde(default = "default_input_pattern")]
    pub pattern: String,
    #[serde(default = "default_true")]
    pub recursive: bool,
}

impl Default for BatchSection {
    fn default() -> Self {
        Self {
            concurrency: None,
            pattern: default_input_pattern(),
            recursive: true,
        }
    }
}

/// Process-wide settings, read once from TOML. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub pipeline: PipelineSection,
    pub chunking: ChunkerConfig,
    pub desensitization: DesensitizationSection,
    pub metadata: MetadataConfig,
    pub batch: BatchSection,
}

impl Settings {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|err| PipelineError::io(path, err))?;
        let settings = Self::from_toml_str(&text)?;
        log::debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Compile the effective pattern catalog in priority order
    pub fn build_catalog(&self) -> Result<PatternCatalog> {
        let section = &self.desensitization;
        let mut defs = if section.builtin {
            PatternCatalog::builtin_defs()?
        } else {
            Vec::new()
        };

        for name in &section.disable {
            if !defs.iter().any(|def| &def.name == name) {
                log::warn!("Cannot disable unknown pattern category '{name}'");
            }
        }
        defs.retain(|def| !section.disable.contains(&def.name));
        defs.extend(section.patterns.iter().cloned());

        Ok(PatternCatalog::compile(defs)?)
    }

    /// Options for `process`, with the catalog compiled and chunk limits
    /// validated up front
    pub fn process_options(&self) -> Result<ProcessOptions> {
        self.chunking.validate()?;
        let catalog = Arc::new(self.build_catalog()?);
        Ok(ProcessOptions {
            desensitize: self.pipeline.desensitize,
            unify_format: self.pipeline.unify_format,
            chunk: self.pipeline.chunk,
            extract_metadata: self.pipeline.extract_metadata,
            chunking: self.chunking,
            metadata: self.metadata,
            catalog,
        })
    }
}
