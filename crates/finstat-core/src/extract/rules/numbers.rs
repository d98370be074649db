//! Locale-aware numeric token parsing.

use super::patterns::AMOUNT_TOKEN;

/// Parse a numeric token into a signed float, handling thousands
/// separators, parenthesized negatives, and the European decimal-comma
/// convention. Fail-soft: unparseable input yields `None`, never an error.
pub fn parse_amount(token: &str) -> Option<f64> {
    let mut s = token.trim().to_string();
    if s.is_empty() {
        return None;
    }

    // Accounting convention: (1,234) means -1234.
    if s.starts_with('(') && s.ends_with(')') {
        s = format!("-{}", &s[1..s.len() - 1]);
    }

    // European convention: a '.' before a ',' means '.' groups thousands
    // and ',' marks decimals (1.234,56). Must be resolved before the
    // separator strip below, which would destroy the decimal comma.
    if let (Some(dot), Some(comma)) = (s.find('.'), s.find(',')) {
        if dot < comma {
            s = s.replace('.', "").replace(',', ".");
        }
    }

    // Remaining commas and embedded spaces are thousands separators.
    s.retain(|c| c != ',' && c != ' ' && c != '\u{00a0}');

    s.parse::<f64>().ok()
}

/// Find the first free-standing numeric token in a span, for the
/// key-value strategies. The returned slice is suitable for
/// [`parse_amount`].
pub fn first_amount_token(text: &str) -> Option<&str> {
    AMOUNT_TOKEN.find(text).map(|m| m.as_str())
}
