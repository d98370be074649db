//! Placeholder tail of the free-form cascade.

use crate::extract::{DocumentContext, ExtractionStrategy, PartialExtraction, Result};

/// Always yields an empty partial. Holds the final slot of the free-form
/// cascade for future line-oriented heuristics; its warning records that
/// the cascade ran out of real strategies.
pub struct LineScanStrategy;

impl ExtractionStrategy for LineScanStrategy {
    fn name(&self) -> &'static str {
        "line-scan"
    }

    fn extract(&self, _doc: &DocumentContext<'_>) -> Result<PartialExtraction> {
        Ok(PartialExtraction {
            warnings: vec!["Using basic line-by-line extraction".to_string()],
            ..PartialExtraction::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_always_empty_with_warning() {
        let out = LineScanStrategy
            .extract(&DocumentContext::new("Revenue: 1234.5"))
            .unwrap();
        assert!(!out.has_values());
        assert_eq!(out.warnings.len(), 1);
    }
}
