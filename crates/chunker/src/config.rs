use crate::error::{ChunkerError, Result};
use serde::{Deserialize, Serialize};

/// Size limits for chunking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkerConfig {
    /// Maximum lines per chunk, overlap included (hard limit)
    pub max_lines: usize,

    /// Maximum bytes per chunk, each line costing its length plus one
    /// (hard limit unless a single line is larger)
    pub max_bytes: usize,

    /// Lines of the previous chunk repeated at the start of the next
    pub overlap_lines: usize,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            max_lines: 5000,
            max_bytes: 1_048_576,
            overlap_lines: 100,
        }
    }
}

impl ChunkerConfig {
    pub const fn new(max_lines: usize, max_bytes: usize, overlap_lines: usize) -> Self {
        Self {
            max_lines,
            max_bytes,
            overlap_lines,
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.max_lines == 0 {
            return Err(ChunkerError::invalid_config("max_lines must be > 0"));
        }

        if self.max_bytes == 0 {
            return Err(ChunkerError::invalid_config("max_bytes must be > 0"));
        }

        if self.overlap_lines >= self.max_lines {
            return Err(ChunkerError::invalid_config(format!(
                "overlap_lines ({}) must be smaller than max_lines ({})",
                self.overlap_lines, self.max_lines
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        assert!(ChunkerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = ChunkerConfig::new(4, 1024, 1);
        assert!(config.validate().is_ok());

        // Invalid: overlap == max_lines
        config.overlap_lines = 4;
        assert!(config.validate().is_err());

        // Invalid: overlap > max_lines
        config.overlap_lines = 10;
        assert!(config.validate().is_err());

        // Invalid: zero limits
        assert!(ChunkerConfig::new(0, 1024, 0).validate().is_err());
        assert!(ChunkerConfig::new(4, 0, 0).validate().is_err());

        // Valid: no overlap
        assert!(ChunkerConfig::new(1, 1, 0).validate().is_ok());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: ChunkerConfig = serde_json::from_str(r#"{"max_lines": 200}"#).unwrap();
        assert_eq!(config.max_lines, 200);
        assert_eq!(config.overlap_lines, 100);
        assert_eq!(config.max_bytes, 1_048_576);
    }
}
