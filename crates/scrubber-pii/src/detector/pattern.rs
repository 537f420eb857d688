//! User-configured regex detector

use super::{CustomPattern, Detector};
use crate::error::{Error, Result};
use crate::span::{Category, Span};
use regex::Regex;

/// Detects matches of a single configured pattern under its own category
pub struct PatternDetector {
    category: Category,
    regex: Regex,
    confidence: f32,
    priority: u32,
}

impl PatternDetector {
    /// Create a detector for an arbitrary category
    pub fn new(category: Category, pattern: &str, confidence: f32) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|source| Error::InvalidPattern {
            name: category.to_string(),
            source,
        })?;
        let priority = category.default_priority();

        Ok(Self {
            category,
            regex,
            confidence: confidence.clamp(0.0, 1.0),
            priority,
        })
    }

    pub fn from_custom(pattern: &CustomPattern) -> Result<Self> {
        if pattern.name.trim().is_empty() {
            return Err(Error::Config("custom pattern name must not be empty".to_string()));
        }

        let mut detector = Self::new(
            Category::custom(&pattern.name),
            &pattern.pattern,
            pattern.confidence,
        )?;
        if let Some(priority) = pattern.priority {
            detector.priority = priority;
        }
        Ok(detector)
    }

    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }
}

impl Detector for PatternDetector {
    fn category(&self) -> Category {
        self.category.clone()
    }

    fn priority(&self) -> u32 {
        self.priority
    }

    fn detect(&self, text: &str) -> Vec<Span> {
        self.regex
            .find_iter(text)
            .filter(|m| m.start() < m.end())
            .map(|m| {
                Span::new(self.category.clone(), m.start(), m.end(), self.confidence)
                    .with_priority(self.priority)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_pattern() {
        let pattern = CustomPattern {
            name: "employee id".to_string(),
            pattern: r"EMP-\d{5}".to_string(),
            confidence: 0.9,
            priority: Some(99),
        };

        let detector = PatternDetector::from_custom(&pattern).unwrap();
        let text = "Badge EMP-00412 scanned";
        let spans = detector.detect(text);

        assert_eq!(detector.category().as_str(), "EMPLOYEE_ID");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].as_str(text), Some("EMP-00412"));
        assert_eq!(spans[0].priority, 99);
        assert_eq!(spans[0].confidence, 0.9);
    }

    #[test]
    fn test_default_priority() {
        let detector =
            PatternDetector::new(Category::custom("ward"), r"Ward \d+", 0.6).unwrap();
        let spans = detector.detect("Ward 7");
        assert_eq!(spans[0].priority, 50);
    }

    #[test]
    fn test_empty_matches_are_skipped() {
        let detector = PatternDetector::new(Category::custom("maybe"), r"x*", 0.5).unwrap();
        assert!(detector.detect("abc").is_empty());
    }

    #[test]
    fn test_invalid_pattern() {
        let pattern = CustomPattern {
            name: "broken".to_string(),
            pattern: r"(unclosed".to_string(),
            confidence: 0.9,
            priority: None,
        };

        let err = PatternDetector::from_custom(&pattern).err().unwrap();
        assert!(matches!(err, Error::InvalidPattern { ref name, .. } if name == "BROKEN"));
    }

    #[test]
    fn test_blank_name_rejected() {
        let pattern = CustomPattern {
            name: "  ".to_string(),
            pattern: r"\d+".to_string(),
            confidence: 0.9,
            priority: None,
        };
        assert!(matches!(
            PatternDetector::from_custom(&pattern),
            Err(Error::Config(_))
        ));
    }
}
