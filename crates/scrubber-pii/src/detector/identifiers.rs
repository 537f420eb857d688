//! Appointment and insurance reference detectors
//!
//! Both categories are free-form alphanumeric references, recognised either
//! by a well-known prefix or by the keyword that introduces them. For
//! keyword forms only the reference itself is covered by the span.

use super::{Detector, collect_group, collect_matches};
use crate::span::{Category, Span};
use regex::Regex;

const APPOINTMENT_CONFIDENCE: f32 = 0.9;
const INSURANCE_CONFIDENCE: f32 = 0.85;

fn has_digit(s: &str) -> bool {
    s.chars().any(|c| c.is_ascii_digit())
}

/// Drop spans nested inside a longer span from the same detector
fn finish(mut spans: Vec<Span>) -> Vec<Span> {
    spans.sort_by_key(|s| (s.start, std::cmp::Reverse(s.end)));

    let mut kept: Vec<Span> = Vec::with_capacity(spans.len());
    for span in spans {
        if kept.last().is_some_and(|last| span.end <= last.end) {
            continue;
        }
        kept.push(span);
    }
    kept
}

/// Detects appointment and booking references
pub struct AppointmentIdDetector {
    prefixed: Regex,
    keyword: Regex,
}

impl AppointmentIdDetector {
    pub fn new() -> Result<Self, regex::Error> {
        // APT-20231, APPT#5521, APT-2024-0042
        let prefixed = Regex::new(r"\bAPP?T[-#]?\d{3,}(?:-\d+)*\b")?;

        // "appointment id: A7781X", "booking ref 99812"
        let keyword = Regex::new(
            r"\b(?i:appointment|appt\.?|booking)\s*(?i:(?:id|no|number|ref(?:erence)?)\b\.?|#)\s*[:#]?\s*([A-Za-z0-9][A-Za-z0-9-]{3,19})\b",
        )?;

        Ok(Self { prefixed, keyword })
    }
}

impl Detector for AppointmentIdDetector {
    fn category(&self) -> Category {
        Category::AppointmentId
    }

    fn detect(&self, text: &str) -> Vec<Span> {
        let category = Category::AppointmentId;
        let mut spans = Vec::new();

        collect_matches(&self.prefixed, text, &category, APPOINTMENT_CONFIDENCE, &mut spans);
        collect_group(
            &self.keyword,
            text,
            &category,
            APPOINTMENT_CONFIDENCE,
            has_digit,
            &mut spans,
        );

        finish(spans)
    }
}

/// Detects insurance policy, member and claim numbers
pub struct InsuranceIdDetector {
    prefixed: Regex,
    keyword: Regex,
}

impl InsuranceIdDetector {
    pub fn new() -> Result<Self, regex::Error> {
        // INS-0042871, INS99120034
        let prefixed = Regex::new(r"\bINS-?\d{6,12}\b")?;

        // "policy no: STAR-HL-99812", "member id 7712-AB"
        let keyword = Regex::new(
            r"\b(?i:policy|insurance|member|claim)\s*(?i:(?:id|no|number)\b\.?|#)\s*[:#]?\s*([A-Za-z0-9][A-Za-z0-9/-]{4,24})\b",
        )?;

        Ok(Self { prefixed, keyword })
    }
}

impl Detector for InsuranceIdDetector {
    fn category(&self) -> Category {
        Category::InsuranceId
    }

    fn detect(&self, text: &str) -> Vec<Span> {
        let category = Category::InsuranceId;
        let mut spans = Vec::new();

        collect_matches(&self.prefixed, text, &category, INSURANCE_CONFIDENCE, &mut spans);
        collect_group(
            &self.keyword,
            text,
            &category,
            INSURANCE_CONFIDENCE,
            has_digit,
            &mut spans,
        );

        finish(spans)
    }
}
