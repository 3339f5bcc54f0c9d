//! Core library for receipt OCR field extraction.
//!
//! This crate provides:
//! - Line normalization for noisy OCR transcripts
//! - Rule-based date extraction with an injected clock fallback
//! - Total extraction via keyword-scored candidate selection
//! - Receipt data models and a tunable scoring configuration
//!
//! The engine consumes an opaque block of recognized text (OCR itself is an
//! external service) and produces a `{date, total}` record. Every input,
//! however malformed, yields a defined result rather than an error.

pub mod error;
pub mod models;
pub mod receipt;

pub use error::{RecrError, Result};
pub use models::config::{ExtractionConfig, RecrConfig, ScoringConfig};
pub use models::receipt::{CaptureUpload, ReceiptFields};
pub use receipt::rules::dates::{Clock, SystemClock};
pub use receipt::rules::totals::Candidate;
pub use receipt::{normalize_lines, Line, ReceiptExtractor, ReceiptParser, ScanResult};
