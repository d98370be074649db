//! Statement extraction module: strategies, engines, and the pipeline.

pub mod engine;
pub mod pipeline;
pub mod rules;
pub mod strategies;

use std::collections::BTreeMap;

use crate::error::ExtractionError;
use crate::models::statement::{ExtractedValue, LineItem, Period, StatementExtraction};

pub use engine::{Extractor, FreeformExtractor, PatternExtractor};
pub use pipeline::StatementPipeline;

/// Result type for strategy-level extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// A document prepared for extraction: the raw text, its line split, and
/// any years the coordinator detected up front.
pub struct DocumentContext<'a> {
    /// Full document text.
    pub text: &'a str,
    /// The text split into lines.
    pub lines: Vec<&'a str>,
    /// Detected reporting years, in detection order. Empty for the
    /// free-form cascade, which does not pre-scan for years.
    pub years: Vec<String>,
}

impl<'a> DocumentContext<'a> {
    /// Context without year detection.
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            lines: text.lines().collect(),
            years: Vec::new(),
        }
    }

    /// Context carrying pre-detected years.
    pub fn with_years(text: &'a str, years: Vec<String>) -> Self {
        Self {
            text,
            lines: text.lines().collect(),
            years,
        }
    }
}

/// The typed output of one strategy attempt. "No data" is an empty value,
/// never an error; the coordinator's loop is the single decision point for
/// advancing the cascade.
#[derive(Debug, Clone, Default)]
pub struct PartialExtraction {
    /// Extracted values: period -> item -> value.
    pub data: BTreeMap<Period, BTreeMap<LineItem, ExtractedValue>>,
    /// Source snippets mirroring `data`, keyed by item label.
    pub raw: BTreeMap<Period, BTreeMap<String, String>>,
    /// Warnings produced while scanning.
    pub warnings: Vec<String>,
}

impl PartialExtraction {
    /// Whether any period holds at least one value.
    pub fn has_values(&self) -> bool {
        self.data.values().any(|items| !items.is_empty())
    }

    /// Record one extracted value, keeping the raw-snippet mirror in sync.
    /// A later write for the same period and item overwrites the earlier one.
    pub fn record(&mut self, period: &str, item: LineItem, value: ExtractedValue, snippet: &str) {
        self.data
            .entry(period.to_string())
            .or_default()
            .insert(item, value);
        self.raw
            .entry(period.to_string())
            .or_default()
            .insert(item.label().to_string(), snippet.to_string());
    }
}

/// One extraction heuristic in the cascade.
///
/// Implementations hold no per-call mutable state; their lookup tables and
/// compiled patterns are immutable after construction, so a strategy can
/// serve concurrent documents without locking.
pub trait ExtractionStrategy: Send + Sync {
    /// Short name used in logs and warnings.
    fn name(&self) -> &'static str;

    /// Attempt extraction. An `Err` is an unexpected fault; the coordinator
    /// logs it and treats the strategy as having yielded nothing.
    fn extract(&self, doc: &DocumentContext<'_>) -> Result<PartialExtraction>;
}

/// Assemble a final result from the winning partial: compute the
/// missing-items diff, append the summary warning, and pick the overall
/// confidence. `found_confidence` applies when any data was found; an empty
/// partial always yields Low.
fn assemble_result(
    document_name: &str,
    text: &str,
    mut partial: PartialExtraction,
    found_confidence: crate::models::statement::ConfidenceLevel,
) -> StatementExtraction {
    use crate::models::statement::ConfidenceLevel;

    let missing_items = StatementExtraction::missing_from(&partial.data);
    let mut warnings = std::mem::take(&mut partial.warnings);
    if !missing_items.is_empty() {
        let names: Vec<&str> = missing_items.iter().map(|item| item.label()).collect();
        warnings.push(format!("Missing items: {}", names.join(", ")));
    }

    let confidence_overall = if partial.has_values() {
        found_confidence
    } else {
        ConfidenceLevel::Low
    };

    let result = StatementExtraction {
        document_name: document_name.to_string(),
        extracted_at: None,
        currency: rules::detect_currency(text),
        unit: rules::detect_unit(text),
        confidence_overall,
        data: partial.data,
        warnings,
        missing_items,
        raw_extracts: partial.raw,
    };

    // The pipeline never fails the call over an invariant breach; it logs.
    for issue in result.validate() {
        tracing::error!(document = document_name, "invariant violation: {issue}");
    }

    result
}
