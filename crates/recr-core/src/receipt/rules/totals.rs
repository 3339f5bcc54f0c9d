//! Total extraction via keyword-scored candidate selection.
//!
//! Receipts are adversarial: loyalty "you saved" lines, point balances and
//! coupon lines all carry money-shaped numbers, often printed right next to
//! the true total. The rule rejects those lines outright before any scoring,
//! then ranks what is left by keyword and position evidence.

use std::cmp::Ordering;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::models::config::ScoringConfig;
use crate::receipt::lines::{normalize_lines, Line};

use super::patterns::TRAILING_AMOUNT;
use super::FieldExtractor;

/// One line that could plausibly hold the receipt total.
///
/// Candidates are ephemeral: they exist only during one extraction call and
/// are never compared across calls.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// Parsed amount.
    pub value: Decimal,
    /// Accumulated keyword and position score.
    pub score: i32,
    /// Zero-based position of the source line in the normalized sequence.
    pub ordinal: usize,
    /// The line the amount was parsed from.
    pub source: String,
}

impl Candidate {
    fn rank(&self) -> (i32, usize) {
        (self.score, self.ordinal)
    }
}

// Ordering is total: score first, then the later line wins. Ordinals are
// unique within one call, so no two candidates are incomparable and the
// selected winner is deterministic.
impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.rank() == other.rank()
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

/// Total field extractor.
///
/// Keyword sets are uppercased once at construction; lines are uppercased
/// once per call. All matching is substring containment, the same way the
/// receipts themselves vary ("TOTAL", "TOTAL DUE", "Total:").
pub struct TotalExtractor {
    config: ScoringConfig,
    rejection: Vec<String>,
    payment: Vec<String>,
}

impl TotalExtractor {
    pub fn new(config: ScoringConfig) -> Self {
        let rejection = config
            .rejection_keywords
            .iter()
            .map(|k| k.to_uppercase())
            .collect();
        let payment = config
            .payment_keywords
            .iter()
            .map(|k| k.to_uppercase())
            .collect();
        Self {
            config,
            rejection,
            payment,
        }
    }

    /// Collect every surviving candidate from a normalized line sequence.
    pub fn candidates(&self, lines: &[Line<'_>]) -> Vec<Candidate> {
        let mut results = Vec::new();

        for line in lines {
            let upper = line.text.to_uppercase();

            // Hard block, checked first: no score can overcome it.
            if self.rejection.iter().any(|k| upper.contains(k)) {
                continue;
            }

            let Some(caps) = TRAILING_AMOUNT.captures(line.text) else {
                continue;
            };

            let amount_str = caps[1].replace(',', ".");
            let Ok(value) = Decimal::from_str(&amount_str) else {
                continue;
            };

            results.push(Candidate {
                value,
                score: self.score(&upper, line.ordinal, lines.len()),
                ordinal: line.ordinal,
                source: line.text.to_string(),
            });
        }

        results
    }

    /// Pick the winning candidate: highest score, later line on ties.
    pub fn select(&self, lines: &[Line<'_>]) -> Option<Candidate> {
        self.candidates(lines).into_iter().max()
    }

    fn score(&self, upper: &str, ordinal: usize, total_lines: usize) -> i32 {
        let mut score = 0;

        if upper.contains("BALANCE") {
            score += self.config.balance_bonus;
        }
        if upper.contains("TOTAL DUE") {
            score += self.config.total_due_bonus;
        }
        if upper.contains("TOTAL") && !upper.contains("SUB") {
            score += self.config.total_bonus;
        }
        if self.payment.iter().any(|k| upper.contains(k)) {
            score += self.config.payment_bonus;
        }
        if ordinal as f32 > total_lines as f32 * self.config.position_threshold {
            score += self.config.position_bonus;
        }

        score
    }
}

impl Default for TotalExtractor {
    fn default() -> Self {
        Self::new(ScoringConfig::default())
    }
}

impl FieldExtractor for TotalExtractor {
    type Output = Candidate;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        let lines = normalize_lines(text);
        self.select(&lines)
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let lines = normalize_lines(text);
        let mut candidates = self.candidates(&lines);
        candidates.sort_by(|a, b| b.cmp(a));
        candidates
    }
}

/// Extract the winning total from text, rendered with two fraction digits.
pub fn extract_total(text: &str, config: &ScoringConfig) -> Option<String> {
    TotalExtractor::new(config.clone())
        .extract(text)
        .map(|c| format_amount(c.value))
}

/// Render an amount with exactly two fraction digits.
pub fn format_amount(value: Decimal) -> String {
    format!("{:.2}", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> TotalExtractor {
        TotalExtractor::default()
    }

    fn winner(text: &str) -> Option<Candidate> {
        extractor().extract(text)
    }

    #[test]
    fn test_total_due_outranks_subtotal_and_tender() {
        let text = "SUBTOTAL 45.00\nTOTAL DUE 48.60\nVISA 48.60";
        let c = winner(text).unwrap();

        assert_eq!(format_amount(c.value), "48.60");
        assert_eq!(c.ordinal, 1);
    }

    #[test]
    fn test_savings_and_points_lines_hard_rejected() {
        let text = "BALANCE 102.34\nYOU SAVED 15.00\nPOINTS EARNED 200.00";
        let c = winner(text).unwrap();

        assert_eq!(format_amount(c.value), "102.34");
    }

    #[test]
    fn test_rejection_is_absolute() {
        // Even as the only money line on the page, a rejected line never
        // becomes the winner.
        let text = "TOTAL SAVINGS 12.00";
        assert!(winner(text).is_none());

        let text = "COUPON TOTAL DUE 99.99";
        assert!(winner(text).is_none());
    }

    #[test]
    fn test_equal_scores_prefer_the_later_line() {
        let text = "MILK 3.49\nEGGS 4.99";
        let c = winner(text).unwrap();

        assert_eq!(c.ordinal, 1);
        assert_eq!(format_amount(c.value), "4.99");
    }

    #[test]
    fn test_subtotal_never_gets_the_total_bonus() {
        let ex = extractor();
        let lines = normalize_lines("SUBTOTAL 20.00\nTOTAL 22.00");
        let candidates = ex.candidates(&lines);

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].score, 0);
        assert_eq!(candidates[1].score, 20);
    }

    #[test]
    fn test_bonuses_accumulate() {
        let ex = extractor();
        let lines = normalize_lines("TOTAL DUE 48.60");
        let candidates = ex.candidates(&lines);

        // TOTAL DUE earns both the phrase bonus and the bare TOTAL bonus.
        assert_eq!(candidates[0].score, 60);
    }

    #[test]
    fn test_position_bonus_near_the_bottom() {
        let text = "A 1.00\nB 1.00\nC 1.00\nD 1.00\nE 1.00\nF 1.00\nG 1.00\nH 1.00\nI 1.00\nJ 1.00";
        let ex = extractor();
        let lines = normalize_lines(text);
        let candidates = ex.candidates(&lines);

        // Only lines strictly past the 0.8 threshold earn the bonus.
        assert_eq!(candidates[9].score, 5);
        assert_eq!(candidates[8].score, 0);
        assert_eq!(candidates[0].score, 0);
    }

    #[test]
    fn test_comma_decimal_separator_normalized() {
        let c = winner("TOTAL 48,60").unwrap();
        assert_eq!(format_amount(c.value), "48.60");
    }

    #[test]
    fn test_trailing_noise_after_amount() {
        let c = winner("BALANCE 102.34 *").unwrap();
        assert_eq!(format_amount(c.value), "102.34");
    }

    #[test]
    fn test_no_money_pattern_yields_no_candidate() {
        assert!(winner("THANK YOU FOR SHOPPING\nAISLE 4").is_none());
    }

    #[test]
    fn test_payment_keyword_bonus() {
        let ex = extractor();
        let lines = normalize_lines("MASTERCARD 31.07");
        let candidates = ex.candidates(&lines);

        assert_eq!(candidates[0].score, 15);
    }
}
