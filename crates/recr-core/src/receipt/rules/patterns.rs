//! Common regex patterns for receipt extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Numeric date: D/M/Y with 1-2 digit day and month, 2 or 4 digit year,
    // slash or dash separators. No calendar validation.
    pub static ref DATE_NUMERIC: Regex = Regex::new(
        r"\d{1,2}[/\-]\d{1,2}[/\-]\d{2,4}"
    ).unwrap();

    // Money amount anchored toward the end of a line, tolerating trailing
    // non-digit noise (currency glyphs, OCR artifacts). Comma or period
    // accepted as the decimal separator.
    pub static ref TRAILING_AMOUNT: Regex = Regex::new(
        r"(\d+[.,]\d{2})[^\d]*$"
    ).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_pattern_variants() {
        assert!(DATE_NUMERIC.is_match("04/22/24"));
        assert!(DATE_NUMERIC.is_match("4-2-2024"));
        assert!(DATE_NUMERIC.is_match("12/31/2023"));
        assert!(!DATE_NUMERIC.is_match("04.22.24"));
        assert!(!DATE_NUMERIC.is_match("422"));
    }

    #[test]
    fn test_trailing_amount_tolerates_noise() {
        let caps = TRAILING_AMOUNT.captures("TOTAL 48.60 %").unwrap();
        assert_eq!(&caps[1], "48.60");

        let caps = TRAILING_AMOUNT.captures("BALANCE 102,34").unwrap();
        assert_eq!(&caps[1], "102,34");
    }

    #[test]
    fn test_trailing_amount_requires_two_fraction_digits() {
        assert!(!TRAILING_AMOUNT.is_match("AISLE 4"));
        assert!(!TRAILING_AMOUNT.is_match("TOTAL 48.6"));
        assert!(!TRAILING_AMOUNT.is_match("04/22/24"));
    }
}
