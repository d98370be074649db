//! Statement data models - the normalized extraction result shape.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A reporting period key: a 4-digit year, or [`CURRENT_PERIOD`] when no
/// year could be determined.
pub type Period = String;

/// Synthetic period used by the key-value strategies when the document
/// carries no year at all.
pub const CURRENT_PERIOD: &str = "Current";

/// The closed set of canonical income statement line items.
///
/// Declaration order is the canonical display order; the derived `Ord`
/// keeps `BTreeMap<LineItem, _>` iteration in that order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LineItem {
    #[serde(rename = "Revenue")]
    Revenue,
    #[serde(rename = "Cost of Revenue")]
    CostOfRevenue,
    #[serde(rename = "Gross Profit")]
    GrossProfit,
    #[serde(rename = "Operating Expenses")]
    OperatingExpenses,
    #[serde(rename = "Research & Development")]
    ResearchDevelopment,
    #[serde(rename = "Selling, General & Administrative")]
    SellingGeneralAdmin,
    #[serde(rename = "Operating Income")]
    OperatingIncome,
    #[serde(rename = "Interest Expense")]
    InterestExpense,
    #[serde(rename = "Income Tax")]
    IncomeTax,
    #[serde(rename = "Net Income")]
    NetIncome,
    #[serde(rename = "EBITDA")]
    Ebitda,
}

impl LineItem {
    /// Every canonical line item, in display order. This is the universe
    /// against which completeness is measured.
    pub const ALL: [LineItem; 11] = [
        LineItem::Revenue,
        LineItem::CostOfRevenue,
        LineItem::GrossProfit,
        LineItem::OperatingExpenses,
        LineItem::ResearchDevelopment,
        LineItem::SellingGeneralAdmin,
        LineItem::OperatingIncome,
        LineItem::InterestExpense,
        LineItem::IncomeTax,
        LineItem::NetIncome,
        LineItem::Ebitda,
    ];

    /// Canonical display label, identical to the serialized form.
    pub fn label(&self) -> &'static str {
        match self {
            LineItem::Revenue => "Revenue",
            LineItem::CostOfRevenue => "Cost of Revenue",
            LineItem::GrossProfit => "Gross Profit",
            LineItem::OperatingExpenses => "Operating Expenses",
            LineItem::ResearchDevelopment => "Research & Development",
            LineItem::SellingGeneralAdmin => "Selling, General & Administrative",
            LineItem::OperatingIncome => "Operating Income",
            LineItem::InterestExpense => "Interest Expense",
            LineItem::IncomeTax => "Income Tax",
            LineItem::NetIncome => "Net Income",
            LineItem::Ebitda => "EBITDA",
        }
    }
}

impl fmt::Display for LineItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Qualitative trust signal for an extracted value, independent of its
/// numeric correctness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    /// Structurally unambiguous match (table row with exact header years,
    /// colon-delimited key-value).
    High,
    /// Match via fallback heuristics.
    Medium,
    /// Weak or degraded match.
    Low,
    /// The item was sought but no value was found.
    Missing,
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConfidenceLevel::High => "high",
            ConfidenceLevel::Medium => "medium",
            ConfidenceLevel::Low => "low",
            ConfidenceLevel::Missing => "missing",
        };
        f.write_str(label)
    }
}

/// Reporting currency. Detection never fails; it defaults to `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Currency {
    USD,
    EUR,
    GBP,
    JPY,
    CNY,
    #[serde(rename = "UNKNOWN")]
    Unknown,
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::JPY => "JPY",
            Currency::CNY => "CNY",
            Currency::Unknown => "UNKNOWN",
        };
        f.write_str(label)
    }
}

/// Unit of scale for reported values. Informational metadata only; values
/// are never auto-scaled by the detected unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Thousands,
    Millions,
    Billions,
    Actual,
    #[serde(rename = "UNKNOWN")]
    Unknown,
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Unit::Thousands => "thousands",
            Unit::Millions => "millions",
            Unit::Billions => "billions",
            Unit::Actual => "actual",
            Unit::Unknown => "UNKNOWN",
        };
        f.write_str(label)
    }
}

/// A single extracted value with its trust and provenance annotations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedValue {
    /// The numeric value, if one was found.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,

    /// Confidence in the extraction.
    pub confidence: ConfidenceLevel,

    /// The source line/span the value was read from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// Free-text notes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ExtractedValue {
    /// A value found in the document. A value is never recorded without
    /// its provenance.
    pub fn found(value: f64, confidence: ConfidenceLevel, source: impl Into<String>) -> Self {
        Self {
            value: Some(value),
            confidence,
            source: Some(source.into()),
            notes: None,
        }
    }

    /// An item that was sought but not found.
    pub fn missing() -> Self {
        Self {
            value: None,
            confidence: ConfidenceLevel::Missing,
            source: None,
            notes: None,
        }
    }
}

/// The final extraction result for one document.
///
/// Constructed once per extraction call and immutable after return; results
/// from separate invocations are never merged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatementExtraction {
    /// Identity of the source document.
    pub document_name: String,

    /// When the extraction ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted_at: Option<DateTime<Utc>>,

    /// Detected reporting currency.
    pub currency: Currency,

    /// Detected unit of scale.
    pub unit: Unit,

    /// Overall extraction confidence.
    pub confidence_overall: ConfidenceLevel,

    /// Extracted values: period -> line item -> value. Later writes
    /// overwrite earlier ones within a period.
    pub data: BTreeMap<Period, BTreeMap<LineItem, ExtractedValue>>,

    /// Ordered free-text warnings accumulated during extraction.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,

    /// Line items not present in any period's data.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_items: Vec<LineItem>,

    /// Source snippets keyed by period and item label, mirroring `data`
    /// for audit.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub raw_extracts: BTreeMap<Period, BTreeMap<String, String>>,
}

impl StatementExtraction {
    /// Whether any period holds at least one extracted value.
    pub fn has_values(&self) -> bool {
        self.data.values().any(|items| !items.is_empty())
    }

    /// The set of line items present in any period.
    pub fn found_items(&self) -> BTreeSet<LineItem> {
        self.data
            .values()
            .flat_map(|items| items.keys().copied())
            .collect()
    }

    /// Compute the universe-minus-found diff for a data map.
    pub fn missing_from(
        data: &BTreeMap<Period, BTreeMap<LineItem, ExtractedValue>>,
    ) -> Vec<LineItem> {
        let found: BTreeSet<LineItem> = data
            .values()
            .flat_map(|items| items.keys().copied())
            .collect();
        LineItem::ALL
            .iter()
            .copied()
            .filter(|item| !found.contains(item))
            .collect()
    }

    /// Check the structural invariants and return any violations found.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        let expected: BTreeSet<LineItem> = Self::missing_from(&self.data).into_iter().collect();
        let actual: BTreeSet<LineItem> = self.missing_items.iter().copied().collect();
        if actual != expected {
            issues.push("missing_items does not equal universe minus found items".to_string());
        }

        for (period, items) in &self.data {
            for (item, extracted) in items {
                match extracted.value {
                    None => {
                        if !matches!(
                            extracted.confidence,
                            ConfidenceLevel::Missing | ConfidenceLevel::Low
                        ) {
                            issues.push(format!(
                                "{period}/{item}: null value with {:?} confidence",
                                extracted.confidence
                            ));
                        }
                    }
                    Some(_) => {
                        if extracted.source.is_none() {
                            issues.push(format!("{period}/{item}: value without provenance"));
                        }
                    }
                }
            }
        }

        issues
    }
}
