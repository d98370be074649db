//! Document-level currency and unit-of-scale detection.

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::statement::{Currency, Unit};

lazy_static! {
    // Ordered: first match wins. JPY and CNY share the yen/yuan sign, so
    // a bare "¥" resolves to JPY purely by this order - a known
    // limitation of symbol-based detection.
    static ref CURRENCY_PATTERNS: Vec<(Currency, Regex)> = vec![
        (Currency::USD, Regex::new(r"\$|\bdollars?\b|\busd\b").unwrap()),
        (Currency::EUR, Regex::new(r"€|\beuros?\b|\beur\b").unwrap()),
        (Currency::GBP, Regex::new(r"£|\bpounds?\b|\bgbp\b").unwrap()),
        (Currency::JPY, Regex::new(r"¥|\byen\b|\bjpy\b").unwrap()),
        (Currency::CNY, Regex::new(r"¥|\byuan\b|\bcny\b|\brmb\b").unwrap()),
    ];

    static ref UNIT_PATTERNS: Vec<(Unit, Regex)> = vec![
        (Unit::Thousands, Regex::new(r"\bthousands?\b").unwrap()),
        (Unit::Millions, Regex::new(r"\bmillions?\b|\bmln\b|\bmn\b").unwrap()),
        (Unit::Billions, Regex::new(r"\bbillions?\b|\bbn\b").unwrap()),
    ];
}

/// Detect the reporting currency from the full document text.
/// Never fails; no match yields [`Currency::Unknown`].
pub fn detect_currency(text: &str) -> Currency {
    let lower = text.to_lowercase();
    for (currency, pattern) in CURRENCY_PATTERNS.iter() {
        if pattern.is_match(&lower) {
            return *currency;
        }
    }
    Currency::Unknown
}

/// Detect the unit of scale from the full document text. Informational
/// only - extracted values are never scaled by it.
pub fn detect_unit(text: &str) -> Unit {
    let lower = text.to_lowercase();
    for (unit, pattern) in UNIT_PATTERNS.iter() {
        if pattern.is_match(&lower) {
            return *unit;
        }
    }
    Unit::Unknown
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dollar_sign_is_usd() {
        assert_eq!(detect_currency("Revenue $1,234.5"), Currency::USD);
    }

    #[test]
    fn test_currency_words() {
        assert_eq!(detect_currency("amounts in euros"), Currency::EUR);
        assert_eq!(detect_currency("GBP consolidated accounts"), Currency::GBP);
        assert_eq!(detect_currency("reported in yuan"), Currency::CNY);
    }

    #[test]
    fn test_yen_sign_resolves_to_jpy() {
        // Shared symbol; JPY wins by pattern order.
        assert_eq!(detect_currency("¥1,234 net income"), Currency::JPY);
    }

    #[test]
    fn test_unit_words() {
        assert_eq!(detect_unit("In millions, except per share data"), Unit::Millions);
        assert_eq!(detect_unit("figures in thousands"), Unit::Thousands);
        assert_eq!(detect_unit("2.1 bn of revenue"), Unit::Billions);
    }

    #[test]
    fn test_no_match_is_unknown() {
        let text = "Revenue grew strongly this period";
        assert_eq!(detect_currency(text), Currency::Unknown);
        assert_eq!(detect_unit(text), Unit::Unknown);
    }
}
