//! Extraction engines - each runs a fixed strategy cascade and assembles
//! the final result.

use tracing::{debug, info, warn};

use crate::extract::rules::patterns::{YEAR_ANY, YEAR_PAIR};
use crate::extract::strategies::{
    ContextWindowStrategy, KeyValueStrategy, LineScanStrategy, SimpleKeyValueStrategy,
    TableStrategy,
};
use crate::extract::{assemble_result, DocumentContext, ExtractionStrategy, PartialExtraction};
use crate::models::statement::{ConfidenceLevel, StatementExtraction};
use crate::models::ExtractionConfig;

/// Common extraction capability. An alternative engine (for example one
/// backed by an inference service) implements this same contract and may
/// hold a [`PatternExtractor`] to delegate to on failure.
pub trait Extractor: Send + Sync {
    /// Extract financial data from one document's text. Always returns a
    /// structurally valid result; total extraction failure is expressed as
    /// Low overall confidence, not an error.
    fn extract(&self, text: &str) -> crate::error::Result<StatementExtraction>;
}

/// Run the cascade: first strategy with values wins, wholesale. Empty
/// strategies contribute only their warnings; a faulting strategy is
/// logged and treated as empty.
fn run_cascade(
    strategies: &[Box<dyn ExtractionStrategy>],
    doc: &DocumentContext<'_>,
) -> PartialExtraction {
    let mut leftovers = PartialExtraction::default();

    for strategy in strategies {
        match strategy.extract(doc) {
            Ok(partial) if partial.has_values() => {
                debug!("strategy {} produced data", strategy.name());
                return partial;
            }
            Ok(partial) => {
                debug!("strategy {} found nothing", strategy.name());
                leftovers.warnings.extend(partial.warnings);
            }
            Err(e) => {
                warn!("strategy {} failed: {e}", strategy.name());
            }
        }
    }

    leftovers
}

/// Default engine for common well-formed statement layouts.
pub struct FreeformExtractor {
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl FreeformExtractor {
    pub fn new() -> Self {
        Self::with_strategies(vec![
            Box::new(TableStrategy::new()),
            Box::new(KeyValueStrategy::new()),
            Box::new(LineScanStrategy),
        ])
    }

    /// Engine over a caller-supplied cascade, in priority order.
    pub fn with_strategies(strategies: Vec<Box<dyn ExtractionStrategy>>) -> Self {
        Self { strategies }
    }
}

impl Default for FreeformExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for FreeformExtractor {
    fn extract(&self, text: &str) -> crate::error::Result<StatementExtraction> {
        let doc = DocumentContext::new(text);
        let partial = run_cascade(&self.strategies, &doc);
        Ok(assemble_result(
            "Free_Extracted",
            text,
            partial,
            ConfidenceLevel::High,
        ))
    }
}

/// Pattern-matching fallback engine: detects reporting years first, then
/// cascades through the year-aware strategies.
pub struct PatternExtractor {
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl PatternExtractor {
    pub fn new() -> Self {
        Self::with_config(&ExtractionConfig::default())
    }

    pub fn with_config(config: &ExtractionConfig) -> Self {
        Self {
            strategies: vec![
                Box::new(TableStrategy::new()),
                Box::new(ContextWindowStrategy::with_config(config)),
                Box::new(SimpleKeyValueStrategy::new()),
            ],
        }
    }
}

impl Default for PatternExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for PatternExtractor {
    fn extract(&self, text: &str) -> crate::error::Result<StatementExtraction> {
        let doc = DocumentContext::new(text);
        let years = detect_years(&doc.lines, text);
        info!("detected years: {years:?}");

        let doc = DocumentContext::with_years(text, years);
        let partial = run_cascade(&self.strategies, &doc);
        Ok(assemble_result(
            "Pattern_Extracted",
            text,
            partial,
            ConfidenceLevel::Medium,
        ))
    }
}

/// Detect reporting years: a table header pair wins as-is, else every year
/// token in the document, deduplicated and sorted.
pub fn detect_years(lines: &[&str], text: &str) -> Vec<String> {
    for line in lines {
        if let Some(caps) = YEAR_PAIR.captures(line) {
            return vec![caps[1].to_string(), caps[2].to_string()];
        }
    }

    let mut years: Vec<String> = YEAR_ANY
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect();
    years.sort();
    years.dedup();
    years
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExtractionError;
    use crate::extract::Result as StrategyResult;
    use crate::models::statement::{ExtractedValue, LineItem};
    use pretty_assertions::assert_eq;

    /// Strategy that always yields empty.
    struct EmptyStrategy;

    impl ExtractionStrategy for EmptyStrategy {
        fn name(&self) -> &'static str {
            "empty"
        }
        fn extract(&self, _doc: &DocumentContext<'_>) -> StrategyResult<PartialExtraction> {
            Ok(PartialExtraction::default())
        }
    }

    /// Strategy that always faults.
    struct FaultyStrategy;

    impl ExtractionStrategy for FaultyStrategy {
        fn name(&self) -> &'static str {
            "faulty"
        }
        fn extract(&self, _doc: &DocumentContext<'_>) -> StrategyResult<PartialExtraction> {
            Err(ExtractionError::Strategy {
                strategy: "faulty".to_string(),
                message: "synthetic fault".to_string(),
            })
        }
    }

    #[test]
    fn test_cascade_falls_through_empty_table() {
        // A table strategy that never matches must not block key-value.
        let engine = FreeformExtractor::with_strategies(vec![
            Box::new(EmptyStrategy),
            Box::new(KeyValueStrategy::new()),
        ]);
        let result = engine.extract("Revenue: 1234.5\nNet Income: 88.1\n").unwrap();

        assert_eq!(
            result.data["Current"][&LineItem::Revenue].value,
            Some(1234.5)
        );
        assert_eq!(
            result.data["Current"][&LineItem::NetIncome].value,
            Some(88.1)
        );
        assert_eq!(result.confidence_overall, ConfidenceLevel::High);
    }

    #[test]
    fn test_cascade_survives_faulting_strategy() {
        let engine = FreeformExtractor::with_strategies(vec![
            Box::new(FaultyStrategy),
            Box::new(KeyValueStrategy::new()),
        ]);
        let result = engine.extract("Revenue: 10\n").unwrap();
        assert_eq!(result.data["Current"][&LineItem::Revenue].value, Some(10.0));
    }

    #[test]
    fn test_first_nonempty_strategy_wins_wholesale() {
        struct FixedStrategy;
        impl ExtractionStrategy for FixedStrategy {
            fn name(&self) -> &'static str {
                "fixed"
            }
            fn extract(&self, _doc: &DocumentContext<'_>) -> StrategyResult<PartialExtraction> {
                let mut out = PartialExtraction::default();
                out.record(
                    "2023",
                    LineItem::Revenue,
                    ExtractedValue::found(7.0, ConfidenceLevel::High, "Revenue 7"),
                    "Revenue 7",
                );
                Ok(out)
            }
        }

        let engine = FreeformExtractor::with_strategies(vec![
            Box::new(FixedStrategy),
            Box::new(KeyValueStrategy::new()),
        ]);
        // The key-value lines are never consulted.
        let result = engine.extract("Revenue: 999\n").unwrap();
        assert_eq!(result.data.len(), 1);
        assert_eq!(result.data["2023"][&LineItem::Revenue].value, Some(7.0));
    }

    #[test]
    fn test_empty_input_full_miss() {
        let result = FreeformExtractor::new().extract("").unwrap();

        assert_eq!(result.confidence_overall, ConfidenceLevel::Low);
        assert!(!result.has_values());
        assert_eq!(result.missing_items, LineItem::ALL.to_vec());
        assert!(result
            .warnings
            .iter()
            .any(|w| w.starts_with("Missing items:")));
    }

    #[test]
    fn test_freeform_table_scenario() {
        let text = "2022 2023\nRevenue $1,100.2 $1,234.5\n";
        let result = FreeformExtractor::new().extract(text).unwrap();

        // First on-line value lands on the second header year.
        assert_eq!(result.data["2023"][&LineItem::Revenue].value, Some(1100.2));
        assert_eq!(result.data["2022"][&LineItem::Revenue].value, Some(1234.5));
        assert_eq!(result.currency, crate::models::statement::Currency::USD);
    }

    #[test]
    fn test_pattern_engine_medium_confidence() {
        let result = PatternExtractor::new()
            .extract("Gross Profit: 650.0\n")
            .unwrap();

        assert_eq!(result.confidence_overall, ConfidenceLevel::Medium);
        assert_eq!(
            result.data["Current"][&LineItem::GrossProfit].value,
            Some(650.0)
        );
        assert_eq!(result.document_name, "Pattern_Extracted");
    }

    #[test]
    fn test_missing_items_warning_lists_names() {
        let result = FreeformExtractor::new()
            .extract("Revenue: 1234.5\n")
            .unwrap();

        let warning = result
            .warnings
            .iter()
            .find(|w| w.starts_with("Missing items:"))
            .unwrap();
        // Revenue was found, so the list starts at the next canonical item.
        assert!(warning.starts_with("Missing items: Cost of Revenue"));
        assert!(warning.contains("EBITDA"));
    }

    #[test]
    fn test_detect_years_prefers_header_pair() {
        let text = "Overview of 2019 results\n2022 2023\n";
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(detect_years(&lines, text), vec!["2022", "2023"]);
    }

    #[test]
    fn test_detect_years_falls_back_to_text_scan() {
        let text = "From 2021 to 2023, and once more 2021.";
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(detect_years(&lines, text), vec!["2021", "2023"]);
    }
}
