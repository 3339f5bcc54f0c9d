//! Receipt field extraction engine.

use std::time::Instant;

use tracing::{debug, info};

use crate::models::config::{RecrConfig, ScoringConfig};
use crate::models::receipt::ReceiptFields;

use super::lines::normalize_lines;
use super::rules::dates::{Clock, DateExtractor, SystemClock};
use super::rules::totals::{format_amount, TotalExtractor};
use super::rules::FieldExtractor;
use super::ReceiptParser;

/// Result of one extraction call.
#[derive(Debug, Clone)]
pub struct ScanResult {
    /// Extracted receipt fields.
    pub fields: ReceiptFields,
    /// The raw transcript the fields were extracted from.
    pub raw_text: String,
    /// Degraded-outcome warnings. A non-empty list means a fallback value
    /// was used and the fields need human verification.
    pub warnings: Vec<String>,
    /// Number of total candidates that survived filtering.
    pub candidate_count: usize,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Rule-based receipt field extractor.
///
/// Purely functional per call: no state persists across invocations, and
/// repeated calls with identical input produce identical fields. Safe to
/// invoke concurrently from independent calls.
pub struct ReceiptExtractor {
    scoring: ScoringConfig,
    fallback_date_format: String,
    clock: Box<dyn Clock>,
}

impl ReceiptExtractor {
    /// Create an extractor with default scoring and the system clock.
    pub fn new() -> Self {
        Self {
            scoring: ScoringConfig::default(),
            fallback_date_format: "%m/%d/%Y".to_string(),
            clock: Box::new(SystemClock),
        }
    }

    /// Create an extractor from a loaded configuration.
    pub fn from_config(config: &RecrConfig) -> Self {
        Self::new()
            .with_scoring(config.scoring.clone())
            .with_fallback_date_format(&config.extraction.fallback_date_format)
    }

    /// Replace the scoring table.
    pub fn with_scoring(mut self, scoring: ScoringConfig) -> Self {
        self.scoring = scoring;
        self
    }

    /// Set the format used for the fallback date.
    pub fn with_fallback_date_format(mut self, format: impl Into<String>) -> Self {
        self.fallback_date_format = format.into();
        self
    }

    /// Replace the clock backing the fallback date.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }
}

impl Default for ReceiptExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ReceiptParser for ReceiptExtractor {
    fn parse(&self, text: &str) -> ScanResult {
        let start = Instant::now();
        let mut warnings = Vec::new();

        info!("parsing receipt from {} characters of text", text.len());

        // Date: first match over the raw text, so a date split oddly by OCR
        // line-breaking is still found if it survives on one physical line.
        let date = match DateExtractor::new().extract(text) {
            Some(m) => m.value,
            None => {
                warnings.push("no date pattern found, used current date".to_string());
                self.clock
                    .today()
                    .format(&self.fallback_date_format)
                    .to_string()
            }
        };

        let lines = normalize_lines(text);
        let total_extractor = TotalExtractor::new(self.scoring.clone());
        let candidates = total_extractor.candidates(&lines);
        let candidate_count = candidates.len();

        let total = match candidates.into_iter().max() {
            Some(winner) => {
                debug!(
                    "selected total {} (score {}) from line {}: {:?}",
                    winner.value, winner.score, winner.ordinal, winner.source
                );
                format_amount(winner.value)
            }
            None => {
                warnings.push("no total candidate survived filtering".to_string());
                "0.00".to_string()
            }
        };

        debug!(
            "extracted date {:?}, total {:?} from {} lines ({} candidates)",
            date,
            total,
            lines.len(),
            candidate_count
        );

        ScanResult {
            fields: ReceiptFields { date, total },
            raw_text: text.to_string(),
            warnings,
            candidate_count,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    use super::*;

    struct FixedClock(NaiveDate);

    impl Clock for FixedClock {
        fn today(&self) -> NaiveDate {
            self.0
        }
    }

    fn extractor() -> ReceiptExtractor {
        ReceiptExtractor::new().with_clock(FixedClock(
            NaiveDate::from_ymd_opt(2024, 4, 22).unwrap(),
        ))
    }

    #[test]
    fn test_total_due_and_tender_outrank_subtotal() {
        let result = extractor().parse("SUBTOTAL 45.00\nTOTAL DUE 48.60\nVISA 48.60");

        assert_eq!(result.fields.total, "48.60");
        assert_eq!(result.candidate_count, 3);
    }

    #[test]
    fn test_savings_lines_rejected_despite_money_pattern() {
        let result = extractor().parse("BALANCE 102.34\nYOU SAVED 15.00\nPOINTS EARNED 200.00");

        assert_eq!(result.fields.total, "102.34");
        assert_eq!(result.candidate_count, 1);
    }

    #[test]
    fn test_date_and_total_from_plain_receipt() {
        let result = extractor().parse("Receipt 04/22/24\nSUBTOTAL 20.00\nTOTAL 22.00");

        assert_eq!(result.fields.date, "04/22/24");
        assert_eq!(result.fields.total, "22.00");
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_fallbacks_when_nothing_matches() {
        let result = extractor().parse("THANK YOU FOR SHOPPING");

        assert_eq!(result.fields.date, "04/22/2024");
        assert_eq!(result.fields.total, "0.00");
        assert_eq!(result.warnings.len(), 2);
    }

    #[test]
    fn test_repeated_calls_are_idempotent() {
        let ex = extractor();
        let text = "KROGER\n04/22/24\nSUBTOTAL 45.00\nTOTAL DUE 48.60\nVISA 48.60";

        let first = ex.parse(text);
        let second = ex.parse(text);

        assert_eq!(first.fields, second.fields);
    }

    #[test]
    fn test_rejected_line_never_wins_even_alone() {
        let result = extractor().parse("YOU SAVED 15.00");

        assert_eq!(result.fields.total, "0.00");
        assert_eq!(result.candidate_count, 0);
    }

    #[test]
    fn test_custom_scoring_config() {
        let mut scoring = crate::models::config::ScoringConfig::default();
        scoring.rejection_keywords.push("VOID".to_string());

        let result = extractor()
            .with_scoring(scoring)
            .parse("VOID 99.99\nTOTAL 12.50");

        assert_eq!(result.fields.total, "12.50");
    }

    #[test]
    fn test_fallback_date_format_is_configurable() {
        let result = extractor()
            .with_fallback_date_format("%d.%m.%Y")
            .parse("no fields here");

        assert_eq!(result.fields.date, "22.04.2024");
    }
}
