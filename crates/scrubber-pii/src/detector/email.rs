//! Email address detector

use super::{Detector, collect_matches};
use crate::span::{Category, Span};
use regex::Regex;

const CONFIDENCE: f32 = 0.95;

/// Detects `local@domain.tld` addresses
pub struct EmailDetector {
    regex: Regex,
}

impl EmailDetector {
    pub fn new() -> Result<Self, regex::Error> {
        let regex = Regex::new(r"\b[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}\b")?;
        Ok(Self { regex })
    }
}

impl Detector for EmailDetector {
    fn category(&self) -> Category {
        Category::Email
    }

    fn detect(&self, text: &str) -> Vec<Span> {
        let mut spans = Vec::new();
        collect_matches(&self.regex, text, &Category::Email, CONFIDENCE, &mut spans);
        spans
    }
}
