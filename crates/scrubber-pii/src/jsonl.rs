//! Line-delimited JSON batch processing
//!
//! Reads one record per line, scrubs it and writes one result per line.
//! A malformed record is reported and skipped without stopping the run
//! (unless `continue_on_error` is off); an I/O failure always stops it.
//!
//! Offsets in the output are character offsets, not byte offsets.

use crate::error::{Error, Result};
use crate::pipeline::Scrubber;
use crate::span::{Category, DEFAULT_RECORD_ID, RecordResult, Span};
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

/// One input line
#[derive(Debug, Clone, Deserialize)]
pub struct InputRecord {
    pub text: String,

    #[serde(default)]
    pub entry_id: Option<String>,
}

/// One output line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputRecord {
    pub entry_id: String,
    pub scrubbed_text: String,
    pub detected_spans: Vec<OutputSpan>,
    pub types_found: Vec<Category>,
    pub scrubber_version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSpan {
    #[serde(rename = "type")]
    pub category: Category,
    pub start: usize,
    pub end: usize,
    pub confidence: f32,
}

impl OutputRecord {
    /// Convert a result, translating byte offsets into character offsets of `text`
    pub fn from_result(text: &str, result: RecordResult) -> Self {
        let detected_spans = to_char_offsets(text, &result.resolved_spans);
        Self {
            entry_id: result.id,
            scrubbed_text: result.redacted_text,
            detected_spans,
            types_found: result.categories_found,
            scrubber_version: result.scrubber_version,
        }
    }
}

/// Translate start-sorted spans from byte offsets to character offsets
fn to_char_offsets(text: &str, spans: &[Span]) -> Vec<OutputSpan> {
    let mut chars_before = 0;
    let mut byte_pos = 0;
    let mut char_offset = |target: usize| -> usize {
        // Spans arrive sorted, so counting only moves forward
        if target < byte_pos {
            return text[..target].chars().count();
        }
        chars_before += text[byte_pos..target].chars().count();
        byte_pos = target;
        chars_before
    };

    spans
        .iter()
        .map(|span| OutputSpan {
            category: span.category.clone(),
            start: char_offset(span.start),
            end: char_offset(span.end),
            confidence: span.confidence,
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Skip and report bad records instead of aborting the run
    pub continue_on_error: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            continue_on_error: true,
        }
    }
}

/// A record that could not be processed
#[derive(Debug, Clone, PartialEq)]
pub struct RecordError {
    /// 1-based line number in the input
    pub line: usize,
    pub message: String,
}

/// Outcome of a batch run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchSummary {
    /// Records scrubbed and written
    pub processed: usize,

    /// Records skipped because they could not be parsed
    pub failed: usize,

    /// True when the run stopped early on the cancel flag
    pub cancelled: bool,

    pub errors: Vec<RecordError>,
}

fn parse_line(bytes: &[u8]) -> std::result::Result<Option<InputRecord>, String> {
    let line = std::str::from_utf8(bytes).map_err(|e| format!("invalid UTF-8: {}", e))?;
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    serde_json::from_str(line)
        .map(Some)
        .map_err(|e| e.to_string())
}

/// Scrub every record from `reader` and write results to `writer`.
///
/// `cancel` is checked before each record; once it is set the run stops and
/// the summary is marked cancelled. The writer is flushed before returning.
pub fn process_jsonl<R: BufRead, W: Write>(
    scrubber: &Scrubber,
    mut reader: R,
    mut writer: W,
    options: &BatchOptions,
    cancel: &AtomicBool,
) -> Result<BatchSummary> {
    let mut summary = BatchSummary::default();
    let mut buf = Vec::new();
    let mut line_no = 0;

    loop {
        if cancel.load(Ordering::SeqCst) {
            info!(line = line_no, "Batch cancelled");
            summary.cancelled = true;
            break;
        }

        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        line_no += 1;

        let record = match parse_line(&buf) {
            Ok(Some(record)) => record,
            Ok(None) => continue,
            Err(message) => {
                if !options.continue_on_error {
                    return Err(Error::Record {
                        line: line_no,
                        message,
                    });
                }
                warn!(line = line_no, error = %message, "Skipping invalid record");
                summary.failed += 1;
                summary.errors.push(RecordError {
                    line: line_no,
                    message,
                });
                continue;
            }
        };

        let id = record.entry_id.as_deref().unwrap_or(DEFAULT_RECORD_ID);
        let result = scrubber.scrub(&record.text, Some(id));
        debug!(
            line = line_no,
            entry_id = id,
            spans = result.resolved_spans.len(),
            "Record scrubbed"
        );

        let output = OutputRecord::from_result(&record.text, result);
        serde_json::to_writer(&mut writer, &output)?;
        writer.write_all(b"\n")?;
        summary.processed += 1;
    }

    writer.flush()?;

    info!(
        processed = summary.processed,
        failed = summary.failed,
        cancelled = summary.cancelled,
        "Batch complete"
    );

    Ok(summary)
}
