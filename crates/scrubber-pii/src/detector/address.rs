//! Street address detector

use super::{Detector, collect_matches};
use crate::span::{Category, Span};
use regex::Regex;

const CONFIDENCE: f32 = 0.75;

/// Detects `<house number> <capitalised words> <street suffix>` addresses
pub struct AddressDetector {
    street: Regex,
}

impl AddressDetector {
    pub fn new() -> Result<Self, regex::Error> {
        // 221B Baker Street, 12, Shanti Nagar, 4 MG Road, 9 Lake View Sector 21
        let street = Regex::new(
            r"\b\d{1,5}[A-Za-z]?,?\s+(?:[A-Z][A-Za-z'.-]*\s+){1,4}(?:Street|St|Road|Rd|Avenue|Ave|Lane|Ln|Nagar|Marg|Colony|Drive|Boulevard|Blvd|Sector\s+\d{1,3})\b",
        )?;
        Ok(Self { street })
    }
}

impl Detector for AddressDetector {
    fn category(&self) -> Category {
        Category::Address
    }

    fn detect(&self, text: &str) -> Vec<Span> {
        let mut spans = Vec::new();
        collect_matches(&self.street, text, &Category::Address, CONFIDENCE, &mut spans);
        spans
    }
}
