//! Two-column table extraction driven by a two-year header line.

use tracing::debug;

use crate::extract::rules::patterns::{BOILERPLATE, TABLE_ROW, YEAR_PAIR};
use crate::extract::rules::{parse_amount, LineItemNormalizer};
use crate::extract::{DocumentContext, ExtractionStrategy, PartialExtraction, Result};
use crate::models::statement::{ConfidenceLevel, ExtractedValue};

/// Extracts tabular statements whose header names two fiscal years and
/// whose data rows carry a label followed by two numbers.
pub struct TableStrategy {
    normalizer: LineItemNormalizer,
}

impl TableStrategy {
    pub fn new() -> Self {
        Self {
            normalizer: LineItemNormalizer::new(),
        }
    }

    pub fn with_normalizer(normalizer: LineItemNormalizer) -> Self {
        Self { normalizer }
    }

    /// Locate the header line holding two four-digit years; returns its
    /// index and the years in left-to-right order.
    fn find_header(lines: &[&str]) -> Option<(usize, String, String)> {
        for (idx, line) in lines.iter().enumerate() {
            if let Some(caps) = YEAR_PAIR.captures(line) {
                return Some((idx, caps[1].to_string(), caps[2].to_string()));
            }
        }
        None
    }
}

impl Default for TableStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractionStrategy for TableStrategy {
    fn name(&self) -> &'static str {
        "table"
    }

    fn extract(&self, doc: &DocumentContext<'_>) -> Result<PartialExtraction> {
        let mut out = PartialExtraction::default();

        let Some((header_idx, year_a, year_b)) = Self::find_header(&doc.lines) else {
            return Ok(out);
        };
        debug!("table header at line {header_idx}: years {year_a} {year_b}");

        for line in &doc.lines[header_idx + 1..] {
            let trimmed = line.trim();
            if trimmed.len() < 5 {
                continue;
            }
            let lower = trimmed.to_lowercase();
            if BOILERPLATE.iter().any(|marker| lower.contains(marker)) {
                continue;
            }

            let Some(caps) = TABLE_ROW.captures(line) else {
                continue;
            };
            let label = caps[1].trim().to_string();
            let Some(item) = self.normalizer.normalize(&label) else {
                debug!("unmapped table label: {label}");
                continue;
            };
            let (Some(first), Some(second)) = (parse_amount(&caps[2]), parse_amount(&caps[3]))
            else {
                continue;
            };

            // Export-order convention observed in right-aligned statements:
            // the first number on the row belongs to the SECOND header year,
            // the second number to the first. Unverified but preserved;
            // pinned by test_header_pair_maps_values_reversed.
            out.record(
                &year_b,
                item,
                ExtractedValue::found(first, ConfidenceLevel::High, trimmed),
                trimmed,
            );
            out.record(
                &year_a,
                item,
                ExtractedValue::found(second, ConfidenceLevel::High, trimmed),
                trimmed,
            );
        }

        Ok(out)
    }
}
