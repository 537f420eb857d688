//! Healthcare provider and facility detector

use super::{Detector, collect_matches};
use crate::span::{Category, Span};
use regex::Regex;

const CONFIDENCE: f32 = 0.8;

/// Capitalised words that open a sentence rather than a facility name
const LEADING_STOPWORDS: [&str; 33] = [
    "a", "admitted", "an", "and", "at", "booked", "by", "called", "checked", "consulted",
    "discharged", "for", "from", "i", "in", "my", "near", "of", "on", "our", "reached",
    "referred", "saw", "the", "to", "today", "tomorrow", "via", "visit", "visited", "went",
    "with", "yesterday",
];

/// Detects named facilities (Apollo Clinic) and doctors (Dr. Mehta)
pub struct ProviderDetector {
    facility: Regex,
    doctor: Regex,
}

impl ProviderDetector {
    pub fn new() -> Result<Self, regex::Error> {
        let facility = Regex::new(
            r"\b((?:[A-Z][A-Za-z&'.-]*\s+){1,4})(?:Hospitals?|Clinic|Polyclinic|Medical\s+Cent(?:er|re)|Health\s+Cent(?:er|re)|Diagnostics|Pharmacy|Labs?|Nursing\s+Home)\b",
        )?;
        let doctor = Regex::new(r"\b(?:Dr\.?|Doctor)\s+[A-Z][a-z]+(?:\s+[A-Z][a-z]+)?")?;
        Ok(Self { facility, doctor })
    }
}

fn is_stopword(word: &str) -> bool {
    let word = word.trim_end_matches(['.', ',']).to_lowercase();
    LEADING_STOPWORDS.contains(&word.as_str())
}

/// Skip leading stopwords in `text[start..prefix_end]`, returning the new start
fn trim_leading_stopwords(text: &str, mut start: usize, prefix_end: usize) -> usize {
    while start < prefix_end {
        let rest = &text[start..prefix_end];
        let word_len = rest.find(char::is_whitespace).unwrap_or(rest.len());
        if !is_stopword(&rest[..word_len]) {
            break;
        }
        let after_word = &rest[word_len..];
        start += word_len + (after_word.len() - after_word.trim_start().len());
    }
    start
}

impl Detector for ProviderDetector {
    fn category(&self) -> Category {
        Category::Provider
    }

    fn detect(&self, text: &str) -> Vec<Span> {
        let mut spans = Vec::new();

        for caps in self.facility.captures_iter(text) {
            let (Some(whole), Some(prefix)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let start = trim_leading_stopwords(text, whole.start(), prefix.end());
            if start < prefix.end() {
                spans.push(Span::new(Category::Provider, start, whole.end(), CONFIDENCE));
            }
        }
        collect_matches(&self.doctor, text, &Category::Provider, CONFIDENCE, &mut spans);

        spans.sort_by_key(|s| s.start);
        spans
    }
}
