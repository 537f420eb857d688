//! PII detectors
//!
//! Each detector is a stateless function from text to candidate spans for a
//! single category. Detectors never see each other's output and may emit
//! overlapping spans; conflicts are settled later by the resolver.

mod address;
mod dob;
mod email;
mod government_id;
mod identifiers;
mod name;
mod pattern;
mod phone;
mod provider;

pub use address::AddressDetector;
pub use dob::DobDetector;
pub use email::EmailDetector;
pub use government_id::GovernmentIdDetector;
pub use identifiers::{AppointmentIdDetector, InsuranceIdDetector};
pub use name::NameDetector;
pub use pattern::PatternDetector;
pub use phone::PhoneDetector;
pub use provider::ProviderDetector;

use crate::error::{Error, Result};
use crate::span::{Category, Span};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Trait for detecting one category of PII in text
///
/// Implementations must not panic for any input; no match is an empty vec.
pub trait Detector: Send + Sync {
    /// Category every emitted span carries
    fn category(&self) -> Category;

    /// Priority every emitted span carries
    fn priority(&self) -> u32 {
        self.category().default_priority()
    }

    /// Detect candidate spans in the given text
    fn detect(&self, text: &str) -> Vec<Span>;
}

/// Configuration for the detector set
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Enable email detection
    pub detect_email: bool,

    /// Enable phone number detection
    pub detect_phone: bool,

    /// Enable date of birth detection
    pub detect_dob: bool,

    /// Enable government id detection
    pub detect_government_id: bool,

    /// Enable appointment id detection
    pub detect_appointment_id: bool,

    /// Enable insurance id detection
    pub detect_insurance_id: bool,

    /// Enable provider detection
    pub detect_provider: bool,

    /// Enable street address detection
    pub detect_address: bool,

    /// Enable personal name detection
    pub detect_name: bool,

    /// Custom regex patterns to detect
    pub custom_patterns: Vec<CustomPattern>,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            detect_email: true,
            detect_phone: true,
            detect_dob: true,
            detect_government_id: true,
            detect_appointment_id: true,
            detect_insurance_id: true,
            detect_provider: true,
            detect_address: true,
            detect_name: true,
            custom_patterns: Vec::new(),
        }
    }
}

impl DetectorConfig {
    /// Instantiate every enabled detector, built-ins first
    pub fn build(&self) -> Result<Vec<Box<dyn Detector>>> {
        let mut detectors: Vec<Box<dyn Detector>> = Vec::new();

        if self.detect_email {
            detectors.push(Box::new(EmailDetector::new().map_err(builtin_error("email"))?));
        }
        if self.detect_phone {
            detectors.push(Box::new(PhoneDetector::new().map_err(builtin_error("phone"))?));
        }
        if self.detect_dob {
            detectors.push(Box::new(DobDetector::new().map_err(builtin_error("dob"))?));
        }
        if self.detect_appointment_id {
            detectors.push(Box::new(
                AppointmentIdDetector::new().map_err(builtin_error("appointment_id"))?,
            ));
        }
        if self.detect_insurance_id {
            detectors.push(Box::new(
                InsuranceIdDetector::new().map_err(builtin_error("insurance_id"))?,
            ));
        }
        if self.detect_government_id {
            detectors.push(Box::new(
                GovernmentIdDetector::new().map_err(builtin_error("government_id"))?,
            ));
        }
        if self.detect_provider {
            detectors.push(Box::new(
                ProviderDetector::new().map_err(builtin_error("provider"))?,
            ));
        }
        if self.detect_address {
            detectors.push(Box::new(AddressDetector::new().map_err(builtin_error("address"))?));
        }
        if self.detect_name {
            detectors.push(Box::new(NameDetector::new().map_err(builtin_error("name"))?));
        }

        for pattern in &self.custom_patterns {
            detectors.push(Box::new(PatternDetector::from_custom(pattern)?));
        }

        Ok(detectors)
    }
}

fn builtin_error(name: &'static str) -> impl FnOnce(regex::Error) -> Error {
    move |source| Error::InvalidPattern {
        name: name.to_string(),
        source,
    }
}

/// Custom regex pattern for detection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomPattern {
    /// Name of the pattern, becomes the category label
    pub name: String,

    /// Regex pattern
    pub pattern: String,

    /// Confidence score for matches
    #[serde(default = "default_custom_confidence")]
    pub confidence: f32,

    /// Resolution priority; defaults to the custom category priority
    #[serde(default)]
    pub priority: Option<u32>,
}

fn default_custom_confidence() -> f32 {
    0.8
}

/// Push one span per regex match, keeping non-empty matches only
fn collect_matches(
    regex: &Regex,
    text: &str,
    category: &Category,
    confidence: f32,
    out: &mut Vec<Span>,
) {
    for m in regex.find_iter(text) {
        if m.start() < m.end() {
            out.push(Span::new(category.clone(), m.start(), m.end(), confidence));
        }
    }
}

/// Push one span per match of capture group 1, e.g. the id after a keyword
fn collect_group(
    regex: &Regex,
    text: &str,
    category: &Category,
    confidence: f32,
    accept: impl Fn(&str) -> bool,
    out: &mut Vec<Span>,
) {
    for caps in regex.captures_iter(text) {
        if let Some(m) = caps.get(1)
            && m.start() < m.end()
            && accept(m.as_str())
        {
            out.push(Span::new(category.clone(), m.start(), m.end(), confidence));
        }
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// True when the character immediately before `pos` is a word character
fn word_char_before(text: &str, pos: usize) -> bool {
    text[..pos].chars().next_back().is_some_and(is_word_char)
}

/// True when the character at `pos` is a word character
fn word_char_after(text: &str, pos: usize) -> bool {
    text[pos..].chars().next().is_some_and(is_word_char)
}

fn digit_count(s: &str) -> usize {
    s.chars().filter(|c| c.is_ascii_digit()).count()
}

#[cfg(test)]
mod tests;
