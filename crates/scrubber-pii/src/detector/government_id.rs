//! Government issued identifier detector

use super::{Detector, collect_matches};
use crate::span::{Category, Span};
use regex::Regex;

const CONFIDENCE: f32 = 0.9;

/// Detects Aadhaar, PAN, US SSN and passport numbers
pub struct GovernmentIdDetector {
    aadhaar: Regex,
    pan: Regex,
    ssn: Regex,
    passport: Regex,
}

impl GovernmentIdDetector {
    pub fn new() -> Result<Self, regex::Error> {
        // Aadhaar: 12 digits in groups of four, never starting with 0 or 1
        let aadhaar = Regex::new(r"\b[2-9]\d{3}[ -]?\d{4}[ -]?\d{4}\b")?;

        // PAN: ABCDE1234F
        let pan = Regex::new(r"\b[A-Z]{5}\d{4}[A-Z]\b")?;

        // SSN: 123-45-6789
        let ssn = Regex::new(r"\b\d{3}-\d{2}-\d{4}\b")?;

        // Passport: one letter and seven digits
        let passport = Regex::new(r"\b[A-Z]\d{7}\b")?;

        Ok(Self {
            aadhaar,
            pan,
            ssn,
            passport,
        })
    }
}

/// Validate a potential SSN
fn validate_ssn(ssn: &str) -> bool {
    let digits: String = ssn.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.len() != 9 {
        return false;
    }

    // All zeros in any group
    if digits.starts_with("000") || digits[3..5] == *"00" || digits[5..9] == *"0000" {
        return false;
    }

    // 666 and 9xx areas are never issued
    !(digits.starts_with("666") || digits.starts_with('9'))
}

impl Detector for GovernmentIdDetector {
    fn category(&self) -> Category {
        Category::GovernmentId
    }

    fn detect(&self, text: &str) -> Vec<Span> {
        let category = Category::GovernmentId;
        let mut spans = Vec::new();

        collect_matches(&self.aadhaar, text, &category, CONFIDENCE, &mut spans);
        collect_matches(&self.pan, text, &category, CONFIDENCE, &mut spans);
        for m in self.ssn.find_iter(text) {
            if validate_ssn(m.as_str()) {
                spans.push(Span::new(category.clone(), m.start(), m.end(), CONFIDENCE));
            }
        }
        collect_matches(&self.passport, text, &category, CONFIDENCE, &mut spans);

        spans.sort_by_key(|s| s.start);
        spans
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect(text: &str) -> Vec<&str> {
        let detector = GovernmentIdDetector::new().unwrap();
        detector
            .detect(text)
            .iter()
            .filter_map(|s| s.as_str(text))
            .collect()
    }

    #[test]
    fn test_aadhaar() {
        assert_eq!(detect("Aadhaar 2345 6789 0123 on file"), vec!["2345 6789 0123"]);
        assert!(detect("Aadhaar 1234 5678 9012").is_empty());
    }

    #[test]
    fn test_pan() {
        assert_eq!(detect("PAN: ABCDE1234F"), vec!["ABCDE1234F"]);
        assert!(detect("PAN: abcde1234f").is_empty());
    }

    #[test]
    fn test_ssn_validation() {
        assert_eq!(detect("My SSN is 123-45-6789"), vec!["123-45-6789"]);
        assert!(detect("Bad SSN: 000-12-3456").is_empty());
        assert!(detect("Bad SSN: 666-12-3456").is_empty());
        assert!(detect("Bad SSN: 923-12-3456").is_empty());
        assert!(detect("Bad SSN: 123-00-3456").is_empty());
    }

    #[test]
    fn test_passport() {
        assert_eq!(detect("Passport J8369854 expires"), vec!["J8369854"]);
    }

    #[test]
    fn test_indian_mobile_is_not_aadhaar() {
        assert!(detect("Call me on +91 98765 43210").is_empty());
    }
}
