//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};

use crate::error::{RecrError, Result};

/// Main configuration for the recr pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RecrConfig {
    /// Extraction configuration.
    pub extraction: ExtractionConfig,

    /// Total-candidate scoring configuration.
    pub scoring: ScoringConfig,
}

/// Extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// strftime format used when no date pattern is found and the engine
    /// falls back to the current date.
    pub fallback_date_format: String,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            fallback_date_format: "%m/%d/%Y".to_string(),
        }
    }
}

/// Scoring table for total-candidate selection.
///
/// The keyword sets and bonus weights drifted across revisions of the
/// field-tested heuristics; they live here, versioned once, instead of
/// being forked per call site.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Keywords that disqualify a line outright, regardless of score.
    /// Matched case-insensitively against the whole line.
    pub rejection_keywords: Vec<String>,

    /// Payment-method/settlement keywords (receipts frequently restate the
    /// charged amount next to the tender method).
    pub payment_keywords: Vec<String>,

    /// Bonus for a line containing `BALANCE`.
    pub balance_bonus: i32,

    /// Bonus for a line containing `TOTAL DUE`.
    pub total_due_bonus: i32,

    /// Bonus for a line containing `TOTAL` but not `SUB`.
    pub total_bonus: i32,

    /// Bonus for a line containing any payment keyword.
    pub payment_bonus: i32,

    /// Fraction of the line sequence (in [0, 1]) past which a line earns
    /// the position bonus. Totals are near-universally printed at the end.
    pub position_threshold: f32,

    /// Bonus for a line past the position threshold.
    pub position_bonus: i32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            rejection_keywords: [
                "SAVINGS", "SAVED", "POINTS", "YOU", "COUPON", "DISCOUNT", "OFF", "REWARD",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            payment_keywords: ["PAID", "VISA", "MASTERCARD", "DEBIT", "TENDER"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            balance_bonus: 50,
            total_due_bonus: 40,
            total_bonus: 20,
            payment_bonus: 15,
            position_threshold: 0.8,
            position_bonus: 5,
        }
    }
}

impl RecrConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| RecrError::Config(e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| RecrError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scoring_table() {
        let scoring = ScoringConfig::default();

        assert!(scoring.rejection_keywords.contains(&"SAVINGS".to_string()));
        assert!(scoring.rejection_keywords.contains(&"REWARD".to_string()));
        assert_eq!(scoring.balance_bonus, 50);
        assert_eq!(scoring.position_threshold, 0.8);
    }

    #[test]
    fn test_config_roundtrip() {
        let config = RecrConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: RecrConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.scoring.total_due_bonus, config.scoring.total_due_bonus);
        assert_eq!(
            parsed.extraction.fallback_date_format,
            config.extraction.fallback_date_format
        );
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let parsed: RecrConfig =
            serde_json::from_str(r#"{"scoring": {"balance_bonus": 20}}"#).unwrap();

        assert_eq!(parsed.scoring.balance_bonus, 20);
        assert_eq!(parsed.scoring.total_bonus, 20);
        assert_eq!(parsed.extraction.fallback_date_format, "%m/%d/%Y");
    }
}
