//! Context-window extraction for narrative documents mentioning years.

use regex::Regex;
use tracing::debug;

use crate::extract::rules::patterns::{NUMBER_FRAGMENT, YEAR_ANY};
use crate::extract::rules::{parse_amount, LineItemNormalizer};
use crate::extract::{DocumentContext, ExtractionStrategy, PartialExtraction, Result};
use crate::models::statement::{ConfidenceLevel, ExtractedValue, LineItem};
use crate::models::ExtractionConfig;

/// Bytes of context inspected on each side of a matched number when
/// deciding whether it belongs to the target year.
const YEAR_GUARD_SPAN: usize = 50;

/// Extracts values from prose by searching a window of lines around each
/// year mention for "<label variation> ... <number>" shapes. Requires at
/// least two distinct detected years; otherwise yields nothing and the
/// cascade moves on.
pub struct ContextWindowStrategy {
    /// Per-item search patterns, one per known label variation, in
    /// variation-table order.
    patterns: Vec<(LineItem, Vec<Regex>)>,
    context_lines: usize,
    recent_year_min: i32,
    recent_year_max: i32,
}

impl ContextWindowStrategy {
    pub fn new() -> Self {
        Self::with_config(&ExtractionConfig::default())
    }

    pub fn with_config(config: &ExtractionConfig) -> Self {
        let normalizer = LineItemNormalizer::new();
        let patterns = LineItem::ALL
            .iter()
            .map(|&item| {
                let variation_patterns = normalizer
                    .variations_for(item)
                    .into_iter()
                    .map(|variation| {
                        // Label and number must share a line: '.' does not
                        // cross '\n'.
                        Regex::new(&format!(
                            "(?i){}.*?{}",
                            regex::escape(variation),
                            NUMBER_FRAGMENT
                        ))
                        .unwrap()
                    })
                    .collect();
                (item, variation_patterns)
            })
            .collect();

        Self {
            patterns,
            context_lines: config.context_lines,
            recent_year_min: config.recent_year_min,
            recent_year_max: config.recent_year_max,
        }
    }

    /// Every line mentioning the year, each with `context_lines` of
    /// surrounding lines, concatenated in document order.
    fn year_context(&self, lines: &[&str], year: &str) -> String {
        let mut collected: Vec<&str> = Vec::new();
        for (idx, line) in lines.iter().enumerate() {
            if line.contains(year) {
                let start = idx.saturating_sub(self.context_lines);
                let end = (idx + self.context_lines + 1).min(lines.len());
                collected.extend_from_slice(&lines[start..end]);
            }
        }
        collected.join("\n")
    }

    /// Whether the span names the target year, or any year in the
    /// configured recent range.
    fn span_supports_year(&self, span: &str, year: &str) -> bool {
        if span.contains(year) {
            return true;
        }
        YEAR_ANY.find_iter(span).any(|m| {
            m.as_str()
                .parse::<i32>()
                .is_ok_and(|y| (self.recent_year_min..=self.recent_year_max).contains(&y))
        })
    }
}

impl Default for ContextWindowStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractionStrategy for ContextWindowStrategy {
    fn name(&self) -> &'static str {
        "context-window"
    }

    fn extract(&self, doc: &DocumentContext<'_>) -> Result<PartialExtraction> {
        let mut out = PartialExtraction::default();

        if doc.years.len() < 2 {
            return Ok(out);
        }

        for year in &doc.years {
            let context = self.year_context(&doc.lines, year);
            if context.is_empty() {
                continue;
            }

            for (item, variation_patterns) in &self.patterns {
                'variations: for pattern in variation_patterns {
                    let Some(caps) = pattern.captures(&context) else {
                        continue;
                    };
                    let full = caps.get(0).unwrap();
                    let Some(value) = parse_amount(&caps[1]) else {
                        continue;
                    };

                    // Guard against pulling a number that belongs to an
                    // adjacent year's sentence.
                    let span = clamp_span(
                        &context,
                        full.start().saturating_sub(YEAR_GUARD_SPAN),
                        full.end() + YEAR_GUARD_SPAN,
                    );
                    if !self.span_supports_year(span, year) {
                        continue;
                    }

                    debug!("context match for {item} in {year}: {}", full.as_str());
                    out.record(
                        year,
                        *item,
                        ExtractedValue::found(value, ConfidenceLevel::High, full.as_str()),
                        full.as_str(),
                    );
                    break 'variations;
                }
            }
        }

        Ok(out)
    }
}

/// Slice with byte offsets clamped to valid char boundaries.
fn clamp_span(text: &str, mut start: usize, mut end: usize) -> &str {
    if end > text.len() {
        end = text.len();
    }
    while start > 0 && !text.is_char_boundary(start) {
        start -= 1;
    }
    while end < text.len() && !text.is_char_boundary(end) {
        end += 1;
    }
    &text[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn years(list: &[&str]) -> Vec<String> {
        list.iter().map(|y| y.to_string()).collect()
    }

    #[test]
    fn test_extracts_per_year_from_narrative() {
        // Mentions far enough apart that each year gets a disjoint window.
        let filler = "x\n".repeat(10);
        let text = format!(
            "In 2018 revenue was 1,234.5 and net income was 140.9.\n\
             {filler}\
             In 2015 revenue was 1,100.2 and net income was 120.1.\n"
        );
        let doc = DocumentContext::with_years(&text, years(&["2015", "2018"]));
        let out = ContextWindowStrategy::new().extract(&doc).unwrap();

        assert_eq!(out.data["2018"][&LineItem::Revenue].value, Some(1234.5));
        assert_eq!(out.data["2018"][&LineItem::NetIncome].value, Some(140.9));
        assert_eq!(out.data["2015"][&LineItem::Revenue].value, Some(1100.2));
        assert_eq!(out.data["2015"][&LineItem::NetIncome].value, Some(120.1));
        assert_eq!(
            out.data["2018"][&LineItem::Revenue].confidence,
            ConfidenceLevel::High
        );
    }

    #[test]
    fn test_requires_two_years() {
        let text = "In 2023 revenue was 1,234.5";
        let doc = DocumentContext::with_years(text, years(&["2023"]));
        let out = ContextWindowStrategy::new().extract(&doc).unwrap();
        assert!(!out.has_values());
    }

    #[test]
    fn test_rejects_number_near_wrong_year_only() {
        // The revenue figure sits next to 1998 - not the target year and
        // not in the recent range - with enough padding that the guard
        // span cannot reach the header's year tokens.
        let pad = "a".repeat(60);
        let text = format!(
            "Fiscal 2015 versus fiscal 2016 summary.\n\
             {pad}\n\
             revenue of 999.9 tied to the 1998 restatement\n\
             {pad}\n"
        );
        let doc = DocumentContext::with_years(&text, years(&["2015", "2016"]));
        let out = ContextWindowStrategy::new().extract(&doc).unwrap();
        assert!(!out.has_values());
    }

    #[test]
    fn test_provenance_is_matched_span() {
        let text = "\
Summary for 2023: revenue of 1,234.5 overall.
More detail below.
Summary for 2022: revenue of 1,100.2 overall.
";
        let doc = DocumentContext::with_years(text, years(&["2022", "2023"]));
        let out = ContextWindowStrategy::new().extract(&doc).unwrap();

        let source = out.data["2023"][&LineItem::Revenue]
            .source
            .clone()
            .unwrap();
        assert!(source.starts_with("revenue"));
        assert!(source.ends_with("1,234.5"));
    }

    #[test]
    fn test_clamp_span_respects_char_boundaries() {
        let text = "¥1,234 in 2023";
        // Offset 1 falls inside the multi-byte sign.
        assert_eq!(clamp_span(text, 1, text.len()), text);
    }
}
