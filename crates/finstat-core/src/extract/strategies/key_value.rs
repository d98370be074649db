//! Colon-delimited key-value extraction for single-period documents.

use crate::extract::rules::{first_amount_token, parse_amount, LineItemNormalizer};
use crate::extract::{DocumentContext, ExtractionStrategy, PartialExtraction, Result};
use crate::models::statement::{ConfidenceLevel, ExtractedValue, LineItem, CURRENT_PERIOD};

/// Items the restricted key-value strategy will accept. Everything else on
/// a `Label: Number` line is ignored at this cascade position.
const HIGH_CONFIDENCE_ITEMS: &[LineItem] = &[
    LineItem::Revenue,
    LineItem::OperatingExpenses,
    LineItem::NetIncome,
];

/// Scan every `key: value` line, normalize the key, and record the first
/// numeric token of the value under the synthetic "Current" period.
fn scan_lines(
    lines: &[&str],
    normalizer: &LineItemNormalizer,
    accept: Option<&[LineItem]>,
) -> PartialExtraction {
    let mut out = PartialExtraction::default();

    for line in lines {
        let Some((key, value_str)) = line.split_once(':') else {
            continue;
        };
        let Some(item) = normalizer.normalize(key) else {
            continue;
        };
        if let Some(allowed) = accept {
            if !allowed.contains(&item) {
                continue;
            }
        }
        let Some(value) = first_amount_token(value_str).and_then(parse_amount) else {
            continue;
        };

        let snippet = line.trim();
        out.record(
            CURRENT_PERIOD,
            item,
            ExtractedValue::found(value, ConfidenceLevel::High, snippet),
            snippet,
        );
    }

    out
}

/// Key-value extraction restricted to the high-confidence key set
/// (Revenue, Operating Expenses, Net Income).
pub struct KeyValueStrategy {
    normalizer: LineItemNormalizer,
}

impl KeyValueStrategy {
    pub fn new() -> Self {
        Self {
            normalizer: LineItemNormalizer::new(),
        }
    }
}

impl Default for KeyValueStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractionStrategy for KeyValueStrategy {
    fn name(&self) -> &'static str {
        "key-value"
    }

    fn extract(&self, doc: &DocumentContext<'_>) -> Result<PartialExtraction> {
        Ok(scan_lines(
            &doc.lines,
            &self.normalizer,
            Some(HIGH_CONFIDENCE_ITEMS),
        ))
    }
}

/// Final-fallback key-value extraction over the full variation table,
/// catch-alls included.
pub struct SimpleKeyValueStrategy {
    normalizer: LineItemNormalizer,
}

impl SimpleKeyValueStrategy {
    pub fn new() -> Self {
        Self {
            normalizer: LineItemNormalizer::new(),
        }
    }
}

impl Default for SimpleKeyValueStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractionStrategy for SimpleKeyValueStrategy {
    fn name(&self) -> &'static str {
        "simple-key-value"
    }

    fn extract(&self, doc: &DocumentContext<'_>) -> Result<PartialExtraction> {
        Ok(scan_lines(&doc.lines, &self.normalizer, None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_restricted_set_extracts_current_period() {
        let text = "Revenue: 1234.5\nNet Income: 88.1\n";
        let out = KeyValueStrategy::new()
            .extract(&DocumentContext::new(text))
            .unwrap();

        let current = &out.data[CURRENT_PERIOD];
        assert_eq!(current[&LineItem::Revenue].value, Some(1234.5));
        assert_eq!(current[&LineItem::NetIncome].value, Some(88.1));
        assert_eq!(
            current[&LineItem::Revenue].confidence,
            ConfidenceLevel::High
        );
        assert_eq!(
            current[&LineItem::Revenue].source.as_deref(),
            Some("Revenue: 1234.5")
        );
    }

    #[test]
    fn test_restricted_set_ignores_other_items() {
        let text = "Gross Profit: 650.0\nRevenue: 1000\n";
        let out = KeyValueStrategy::new()
            .extract(&DocumentContext::new(text))
            .unwrap();

        let current = &out.data[CURRENT_PERIOD];
        assert_eq!(current.len(), 1);
        assert!(current.contains_key(&LineItem::Revenue));
    }

    #[test]
    fn test_total_expenses_phrasing_accepted() {
        let text = "Total Expenses: 432.1\n";
        let out = KeyValueStrategy::new()
            .extract(&DocumentContext::new(text))
            .unwrap();

        assert_eq!(
            out.data[CURRENT_PERIOD][&LineItem::OperatingExpenses].value,
            Some(432.1)
        );
    }

    #[test]
    fn test_simple_fallback_covers_full_table() {
        let text = "Gross Profit: 650.0\nInterest Expense: (12.5)\nNotes: see appendix\n";
        let out = SimpleKeyValueStrategy::new()
            .extract(&DocumentContext::new(text))
            .unwrap();

        let current = &out.data[CURRENT_PERIOD];
        assert_eq!(current[&LineItem::GrossProfit].value, Some(650.0));
        assert_eq!(current[&LineItem::InterestExpense].value, Some(-12.5));
        assert_eq!(current.len(), 2);
    }

    #[test]
    fn test_lines_without_numbers_skipped() {
        let text = "Revenue: to be confirmed\n";
        let out = KeyValueStrategy::new()
            .extract(&DocumentContext::new(text))
            .unwrap();
        assert!(!out.has_values());
    }
}
