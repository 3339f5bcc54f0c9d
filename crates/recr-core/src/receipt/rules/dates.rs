//! Date extraction for receipt transcripts.
//!
//! The date rule scans the untouched raw text, not the filtered line
//! sequence, so a date fragment split oddly by OCR line-breaking is still
//! found as long as it survives on one physical line. Matching is purely
//! pattern-based: the engine is not a calendar validator, and a nonsense
//! day like 45/45/45 passes through unchanged.

use chrono::NaiveDate;

use super::patterns::DATE_NUMERIC;
use super::{ExtractionMatch, FieldExtractor};

/// Source of "today" for the fallback date.
///
/// Injected rather than read from the wall clock at the call site, so
/// extraction stays deterministic under test.
pub trait Clock: Send + Sync {
    /// The current local calendar date.
    fn today(&self) -> NaiveDate;
}

/// Production clock backed by the host's local time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

/// Date field extractor.
pub struct DateExtractor;

impl DateExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        DATE_NUMERIC
            .find_iter(text)
            .map(|m| {
                ExtractionMatch::new(m.as_str().to_string(), m.as_str())
                    .with_position(m.start(), m.end())
            })
            .collect()
    }
}

/// Extract the first date-like substring from text.
pub fn extract_date(text: &str) -> Option<String> {
    DateExtractor::new().extract(text).map(|m| m.value)
}
