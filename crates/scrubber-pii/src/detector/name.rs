//! Personal name detector

use super::{Detector, collect_group, collect_matches};
use crate::span::{Category, Span};
use regex::Regex;

const CONFIDENCE: f32 = 0.7;

/// Detects names introduced by an honorific or a self-introduction
pub struct NameDetector {
    honorific: Regex,
    introduced: Regex,
}

impl NameDetector {
    pub fn new() -> Result<Self, regex::Error> {
        let honorific =
            Regex::new(r"\b(?:Mrs|Mr|Ms|Miss|Mx)\.?\s+\p{Lu}\p{Ll}+(?:\s+\p{Lu}\p{Ll}+)?\b")?;
        let introduced =
            Regex::new(r"(?i:\bmy name is|\bname\s*:)\s*(\p{Lu}\p{Ll}+(?:\s+\p{Lu}\p{Ll}+)?)\b")?;
        Ok(Self {
            honorific,
            introduced,
        })
    }
}

impl Detector for NameDetector {
    fn category(&self) -> Category {
        Category::Name
    }

    fn detect(&self, text: &str) -> Vec<Span> {
        let category = Category::Name;
        let mut spans = Vec::new();

        collect_matches(&self.honorific, text, &category, CONFIDENCE, &mut spans);
        collect_group(&self.introduced, text, &category, CONFIDENCE, |_| true, &mut spans);

        spans.sort_by_key(|s| s.start);
        spans
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect(text: &str) -> Vec<&str> {
        let detector = NameDetector::new().unwrap();
        detector
            .detect(text)
            .iter()
            .filter_map(|s| s.as_str(text))
            .collect()
    }

    #[test]
    fn test_honorific_names() {
        assert_eq!(detect("Spoke with Mrs. Priya Nair about it"), vec!["Mrs. Priya Nair"]);
        assert_eq!(detect("Mr Sharma called"), vec!["Mr Sharma"]);
    }

    #[test]
    fn test_introduced_names() {
        let text = "Hi, my name is Arjun Das and I have a cough";
        let spans = NameDetector::new().unwrap().detect(text);

        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].as_str(text), Some("Arjun Das"));
        assert_eq!(spans[0].priority, 60);
        assert_eq!(detect("Name: Zoë"), vec!["Zoë"]);
    }

    #[test]
    fn test_lowercase_is_not_a_name() {
        assert!(detect("my name is not important").is_empty());
        assert!(detect("Severe headache and nausea today").is_empty());
    }
}
