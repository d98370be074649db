//! Document-level orchestration: engine order and result stamping.

use chrono::Utc;
use tracing::{info, warn};

use crate::error::Result;
use crate::extract::engine::{Extractor, FreeformExtractor, PatternExtractor};
use crate::models::statement::StatementExtraction;
use crate::models::FinstatConfig;

/// Runs the free-form engine, falls back to the pattern engine when it
/// produced no values anywhere, and stamps the result with the document's
/// identity and the extraction time.
pub struct StatementPipeline {
    freeform: FreeformExtractor,
    pattern: PatternExtractor,
}

impl StatementPipeline {
    pub fn new() -> Self {
        Self::with_config(&FinstatConfig::default())
    }

    pub fn with_config(config: &FinstatConfig) -> Self {
        Self {
            freeform: FreeformExtractor::new(),
            pattern: PatternExtractor::with_config(&config.extraction),
        }
    }

    /// Extract financial data from one document.
    pub fn process(&self, document_name: &str, text: &str) -> Result<StatementExtraction> {
        info!(
            "extracting from {document_name} ({} characters)",
            text.len()
        );

        let mut result = match self.freeform.extract(text) {
            Ok(result) if result.has_values() => {
                info!("free-form engine extracted data from {document_name}");
                result
            }
            Ok(_) => {
                info!("free-form engine found no values, falling back to pattern matching");
                self.pattern.extract(text)?
            }
            Err(e) => {
                warn!("free-form engine failed: {e}; falling back to pattern matching");
                self.pattern.extract(text)?
            }
        };

        result.document_name = document_name.to_string();
        result.extracted_at = Some(Utc::now());
        Ok(result)
    }
}

impl Default for StatementPipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::statement::{ConfidenceLevel, LineItem};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_stamps_document_identity() {
        let pipeline = StatementPipeline::new();
        let result = pipeline.process("q3.txt", "Revenue: 1234.5\n").unwrap();

        assert_eq!(result.document_name, "q3.txt");
        assert!(result.extracted_at.is_some());
    }

    #[test]
    fn test_free_form_wins_when_it_finds_data() {
        let pipeline = StatementPipeline::new();
        let text = "2022 2023\nRevenue $1,100.2 $1,234.5\n";
        let result = pipeline.process("table.txt", text).unwrap();

        assert_eq!(result.confidence_overall, ConfidenceLevel::High);
        assert_eq!(result.data["2023"][&LineItem::Revenue].value, Some(1100.2));
    }

    #[test]
    fn test_falls_back_to_pattern_engine() {
        let pipeline = StatementPipeline::new();
        // Gross Profit is outside the free-form key set, so only the
        // pattern engine's simple key-value fallback can pick it up.
        let result = pipeline.process("kv.txt", "Gross Profit: 650.0\n").unwrap();

        assert_eq!(result.confidence_overall, ConfidenceLevel::Medium);
        assert_eq!(
            result.data["Current"][&LineItem::GrossProfit].value,
            Some(650.0)
        );
    }

    #[test]
    fn test_empty_document_is_structurally_valid() {
        let pipeline = StatementPipeline::new();
        let result = pipeline.process("empty.txt", "").unwrap();

        assert_eq!(result.confidence_overall, ConfidenceLevel::Low);
        assert_eq!(result.missing_items, LineItem::ALL.to_vec());
        assert!(result.validate().is_empty());
    }
}
