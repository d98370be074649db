//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};

use crate::error::FinstatError;

/// Main configuration for the finstat pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FinstatConfig {
    /// Statement extraction configuration.
    pub extraction: ExtractionConfig,
}

/// Extraction tuning knobs. All lookup tables are fixed at compile time;
/// these only size the heuristics around them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Lines of surrounding context collected on each side of a year
    /// mention by the context-window strategy.
    pub context_lines: usize,

    /// Inclusive lower bound of the "recent year" acceptance range.
    pub recent_year_min: i32,

    /// Inclusive upper bound of the "recent year" acceptance range.
    pub recent_year_max: i32,

    /// Wall-clock budget for one document, enforced by the caller.
    /// A timeout yields an all-missing result, not a failure.
    pub timeout_secs: u64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            context_lines: 5,
            recent_year_min: 2020,
            recent_year_max: 2025,
            timeout_secs: 30,
        }
    }
}

impl FinstatConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| FinstatError::Config(format!("{}: {e}", path.display())))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> crate::error::Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| FinstatError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FinstatConfig::default();
        assert_eq!(config.extraction.context_lines, 5);
        assert_eq!(config.extraction.recent_year_min, 2020);
        assert_eq!(config.extraction.recent_year_max, 2025);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: FinstatConfig =
            serde_json::from_str(r#"{"extraction": {"context_lines": 3}}"#).unwrap();
        assert_eq!(config.extraction.context_lines, 3);
        assert_eq!(config.extraction.timeout_secs, 30);
    }
}
