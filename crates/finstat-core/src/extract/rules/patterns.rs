//! Common regex patterns for financial statement extraction.

use lazy_static::lazy_static;
use regex::Regex;

/// Numeric token fragment shared by the row and context patterns:
/// `1,234`, `1 234.56`, `987.6`.
pub const NUMBER_FRAGMENT: &str = r"(\d{1,3}(?:[,\s]\d{3})*(?:\.\d{1,2})?)";

/// Lines containing any of these (lowercased) substrings are statement
/// boilerplate, not data rows.
pub const BOILERPLATE: &[&str] = &["consolidated", "statement", "in millions", "except per share"];

lazy_static! {
    // Two four-digit years side by side - a table column header.
    pub static ref YEAR_PAIR: Regex = Regex::new(
        r"(20\d{2})\s+(20\d{2})"
    ).unwrap();

    // Any year token. Deliberately unanchored, matching the source convention.
    pub static ref YEAR_ANY: Regex = Regex::new(
        r"20\d{2}|19\d{2}"
    ).unwrap();

    // Table data row: label text, then two optionally dollar-prefixed
    // numbers at end of line. Leading whitespace covers indented rows.
    pub static ref TABLE_ROW: Regex = Regex::new(
        r"^\s*([A-Za-z][A-Za-z\s,&]*?)\s+\$?(\d{1,3}(?:[,\s]\d{3})*(?:\.\d{1,2})?)\s+\$?(\d{1,3}(?:[,\s]\d{3})*(?:\.\d{1,2})?)\s*$"
    ).unwrap();

    // First free-standing amount token in a span: optional parentheses,
    // grouped digits, optional decimal part in either locale convention.
    pub static ref AMOUNT_TOKEN: Regex = Regex::new(
        r"\(?\d+(?:[,\s.]\d{3})*(?:[.,]\d+)?\)?"
    ).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_pair_matches_header() {
        let caps = YEAR_PAIR.captures("Year Ended December 31,   2022    2023").unwrap();
        assert_eq!(&caps[1], "2022");
        assert_eq!(&caps[2], "2023");
    }

    #[test]
    fn test_table_row_captures_label_and_both_numbers() {
        let caps = TABLE_ROW.captures("Revenue $1,100.2 $1,234.5").unwrap();
        assert_eq!(caps[1].trim(), "Revenue");
        assert_eq!(&caps[2], "1,100.2");
        assert_eq!(&caps[3], "1,234.5");
    }

    #[test]
    fn test_table_row_allows_indentation() {
        let caps = TABLE_ROW
            .captures("    Research and development 500.0 450.0")
            .unwrap();
        assert_eq!(caps[1].trim(), "Research and development");
    }

    #[test]
    fn test_table_row_rejects_single_number() {
        assert!(TABLE_ROW.captures("Revenue $1,234.5").is_none());
    }

    #[test]
    fn test_amount_token_spans_formats() {
        let find = |s: &str| AMOUNT_TOKEN.find(s).map(|m| m.as_str().to_string());
        assert_eq!(find("1,234.56 total"), Some("1,234.56".to_string()));
        assert_eq!(find("was (1,234) net"), Some("(1,234)".to_string()));
        assert_eq!(find("approx 1.234,56"), Some("1.234,56".to_string()));
        assert_eq!(find("no numbers here"), None);
    }
}
