//! Label normalization - mapping free-form phrasings to canonical items.

use crate::models::statement::LineItem;

/// The default variation table, ordered. Matching walks this table
/// top-to-bottom and the first hit wins, so overlapping phrases
/// ("operating expenses" vs "expenses") resolve by position, not
/// specificity. Keep it a slice: reproducibility depends on the order.
pub const VARIATIONS: &[(&str, LineItem)] = &[
    ("revenue", LineItem::Revenue),
    ("sales", LineItem::Revenue),
    ("total revenue", LineItem::Revenue),
    ("operating revenue", LineItem::Revenue),
    ("cost of revenue", LineItem::CostOfRevenue),
    ("cost of sales", LineItem::CostOfRevenue),
    ("cost of goods sold", LineItem::CostOfRevenue),
    ("cogs", LineItem::CostOfRevenue),
    ("gross profit", LineItem::GrossProfit),
    ("gross margin", LineItem::GrossProfit),
    ("operating expenses", LineItem::OperatingExpenses),
    ("opex", LineItem::OperatingExpenses),
    ("total operating expenses", LineItem::OperatingExpenses),
    ("expenses", LineItem::OperatingExpenses),
    ("research and development", LineItem::ResearchDevelopment),
    ("r&d", LineItem::ResearchDevelopment),
    ("research & development", LineItem::ResearchDevelopment),
    ("research and development expenses", LineItem::ResearchDevelopment),
    ("selling general and administrative", LineItem::SellingGeneralAdmin),
    ("sg&a", LineItem::SellingGeneralAdmin),
    ("selling, general & administrative", LineItem::SellingGeneralAdmin),
    ("selling, general and administrative", LineItem::SellingGeneralAdmin),
    ("selling general and admin", LineItem::SellingGeneralAdmin),
    ("operating income", LineItem::OperatingIncome),
    ("operating profit", LineItem::OperatingIncome),
    ("income from operations", LineItem::OperatingIncome),
    ("interest expense", LineItem::InterestExpense),
    ("interest", LineItem::InterestExpense),
    ("finance costs", LineItem::InterestExpense),
    ("income tax", LineItem::IncomeTax),
    ("tax expense", LineItem::IncomeTax),
    ("provision for income taxes", LineItem::IncomeTax),
    ("income tax expense", LineItem::IncomeTax),
    ("net income", LineItem::NetIncome),
    ("net profit", LineItem::NetIncome),
    ("net earnings", LineItem::NetIncome),
    ("bottom line", LineItem::NetIncome),
    ("ebitda", LineItem::Ebitda),
    ("earnings before interest", LineItem::Ebitda),
];

/// Maps arbitrary label strings to canonical line items via an ordered
/// substring table. The table is injected at construction so match order
/// is explicit and testable.
#[derive(Debug, Clone)]
pub struct LineItemNormalizer {
    table: &'static [(&'static str, LineItem)],
}

impl LineItemNormalizer {
    /// Normalizer over the default variation table.
    pub fn new() -> Self {
        Self::with_table(VARIATIONS)
    }

    /// Normalizer over a caller-supplied ordered table.
    pub fn with_table(table: &'static [(&'static str, LineItem)]) -> Self {
        Self { table }
    }

    /// Map a label to its canonical item, or `None` when nothing matches.
    /// Deterministic and idempotent: table order decides ties.
    pub fn normalize(&self, label: &str) -> Option<LineItem> {
        let label = label.trim().to_lowercase();
        if label.is_empty() {
            return None;
        }

        for (phrase, item) in self.table {
            if label.contains(phrase) || phrase.contains(label.as_str()) {
                return Some(*item);
            }
        }

        // Catch-alls, only after the table misses.
        if label.contains("r&d") || label.contains("research") {
            return Some(LineItem::ResearchDevelopment);
        }
        if label.contains("sg&a") || label.contains("selling") {
            return Some(LineItem::SellingGeneralAdmin);
        }

        None
    }

    /// The known phrasings for one item, in table order. Used by the
    /// context-window strategy to build its per-item search patterns.
    pub fn variations_for(&self, item: LineItem) -> Vec<&'static str> {
        self.table
            .iter()
            .filter(|(_, candidate)| *candidate == item)
            .map(|(phrase, _)| *phrase)
            .collect()
    }
}

impl Default for LineItemNormalizer {
    fn default() -> Self {
        Self::new()
    }
}
