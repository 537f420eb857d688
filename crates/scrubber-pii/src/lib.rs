//! Scrubber PII Detection and Redaction
//!
//! This crate turns free-text records into redacted text plus structured
//! metadata about what was found:
//! - Email, phone, date of birth, government and medical identifier detection
//! - Provider, address and personal name detection
//! - Deterministic overlap resolution and placeholder replacement
//! - Line-delimited JSON batch processing

pub mod config;
pub mod detector;
pub mod error;
pub mod jsonl;
pub mod pipeline;
pub mod replacer;
pub mod resolver;
pub mod span;

pub use config::{BatchConfig, LoggingConfig, ScrubberConfig};
pub use detector::{CustomPattern, Detector, DetectorConfig};
pub use error::{Error, Result};
pub use jsonl::{BatchOptions, BatchSummary, OutputRecord, process_jsonl};
pub use pipeline::{Scrubber, ScrubberBuilder};
pub use replacer::replace_spans;
pub use resolver::{ResolutionPolicy, resolve_overlaps};
pub use span::{Category, DEFAULT_RECORD_ID, RecordResult, SCRUBBER_VERSION, Span};
