//! Phone number detector

use super::{Detector, digit_count, word_char_after, word_char_before};
use crate::span::{Category, Span};
use regex::Regex;

const CONFIDENCE: f32 = 0.9;

/// Units that follow numeric health measurements rather than phone numbers
const MEASUREMENT_MARKERS: [&str; 5] = ["kg", "kgs", "bpm", "steps", "/"];

/// How far past a match to look for measurement markers
const TRAILING_WINDOW: usize = 6;

/// Detects phone numbers of 10 to 15 digits with common separators
pub struct PhoneDetector {
    regex: Regex,
}

impl PhoneDetector {
    pub fn new() -> Result<Self, regex::Error> {
        // Digits with spaces, dashes and parentheses between them:
        // +91 98765 43210, (555) 123-4567, 555-987-6543
        let regex = Regex::new(r"\+?\d[\d\s\-()]{7,}\d")?;
        Ok(Self { regex })
    }

    fn validate(&self, text: &str, start: usize, end: usize) -> bool {
        if word_char_before(text, start) || word_char_after(text, end) {
            return false;
        }

        let digits = digit_count(&text[start..end]);
        if !(10..=15).contains(&digits) {
            return false;
        }

        !followed_by_measurement(text, end)
    }

    /// Longest valid number starting at `start` that ends on a digit of `candidate`
    fn longest_valid(&self, text: &str, start: usize, candidate: &str) -> Option<usize> {
        candidate
            .char_indices()
            .rev()
            .filter(|(_, c)| c.is_ascii_digit())
            .map(|(i, _)| start + i + 1)
            .find(|&end| self.validate(text, start, end))
    }
}

fn followed_by_measurement(text: &str, end: usize) -> bool {
    let trailing: String = text[end..]
        .chars()
        .take(TRAILING_WINDOW)
        .collect::<String>()
        .to_lowercase();
    MEASUREMENT_MARKERS.iter().any(|m| trailing.contains(m))
}

impl Detector for PhoneDetector {
    fn category(&self) -> Category {
        Category::Phone
    }

    fn detect(&self, text: &str) -> Vec<Span> {
        let mut spans = Vec::new();
        let mut pos = 0;

        // The greedy match may run into a following word ("9876543210 3pm"),
        // so back off to a shorter number before giving up on this start.
        while let Some(m) = self.regex.find_at(text, pos) {
            match self.longest_valid(text, m.start(), m.as_str()) {
                Some(end) => {
                    spans.push(Span::new(Category::Phone, m.start(), end, CONFIDENCE));
                    pos = end;
                }
                None => {
                    let step = text[m.start()..].chars().next().map_or(1, char::len_utf8);
                    pos = m.start() + step;
                }
            }
        }

        spans
    }
}
