//! Scrubbing pipeline
//!
//! Runs every registered detector, resolves conflicts between their
//! candidates, replaces the survivors with placeholders and assembles the
//! per-record result. A [`Scrubber`] holds no mutable state, so one instance
//! can be shared across threads and records.

use crate::config::ScrubberConfig;
use crate::detector::{Detector, DetectorConfig};
use crate::error::Result;
use crate::replacer::replace_spans;
use crate::resolver::{ResolutionPolicy, resolve_overlaps};
use crate::span::{Category, DEFAULT_RECORD_ID, RecordResult, SCRUBBER_VERSION, Span};
use std::collections::BTreeSet;
use tracing::{debug, trace};

/// PII scrubbing pipeline over a fixed detector set
pub struct Scrubber {
    detectors: Vec<Box<dyn Detector>>,
    policy: ResolutionPolicy,
    min_confidence: f32,
}

impl Scrubber {
    /// Create a scrubber from an explicit detector set
    pub fn new(detectors: Vec<Box<dyn Detector>>, policy: ResolutionPolicy) -> Self {
        Self {
            detectors,
            policy,
            min_confidence: 0.0,
        }
    }

    pub fn builder() -> ScrubberBuilder {
        ScrubberBuilder::default()
    }

    /// Every built-in detector with the default resolution policy
    pub fn default_set() -> Result<Self> {
        let detectors = DetectorConfig::default().build()?;
        Ok(Self::new(detectors, ResolutionPolicy::default()))
    }

    /// Build the detector set and policy described by `config`
    pub fn from_config(config: &ScrubberConfig) -> Result<Self> {
        let detectors = config.detectors.build()?;
        debug!(
            detectors = detectors.len(),
            policy = %config.resolution,
            min_confidence = config.min_confidence,
            "Built scrubber"
        );

        Ok(Self {
            detectors,
            policy: config.resolution,
            min_confidence: config.min_confidence,
        })
    }

    pub fn policy(&self) -> ResolutionPolicy {
        self.policy
    }

    /// Categories of the registered detectors, in registration order
    pub fn categories(&self) -> Vec<Category> {
        self.detectors.iter().map(|d| d.category()).collect()
    }

    /// Categories with the priority their spans carry, in registration order
    pub fn priorities(&self) -> Vec<(Category, u32)> {
        self.detectors
            .iter()
            .map(|d| (d.category(), d.priority()))
            .collect()
    }

    /// Union of every detector's candidates, in detector order
    pub fn detect_candidates(&self, text: &str) -> Vec<Span> {
        self.detectors
            .iter()
            .flat_map(|detector| detector.detect(text))
            .collect()
    }

    /// Scrub one record.
    ///
    /// `id` is echoed back unchanged; [`DEFAULT_RECORD_ID`] is used when absent.
    pub fn scrub(&self, text: &str, id: Option<&str>) -> RecordResult {
        let id = id.unwrap_or(DEFAULT_RECORD_ID);

        let candidates: Vec<Span> = self
            .detect_candidates(text)
            .into_iter()
            .filter(|s| s.confidence >= self.min_confidence)
            .collect();
        let candidate_count = candidates.len();

        let resolved_spans = resolve_overlaps(candidates, self.policy);
        let redacted_text = replace_spans(text, &resolved_spans);

        let categories_found: Vec<Category> = resolved_spans
            .iter()
            .map(|s| s.category.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        trace!(
            record_id = id,
            candidates = candidate_count,
            resolved = resolved_spans.len(),
            "Scrubbed record"
        );

        RecordResult {
            id: id.to_string(),
            redacted_text,
            resolved_spans,
            categories_found,
            scrubber_version: SCRUBBER_VERSION.to_string(),
        }
    }
}

/// Builder for a [`Scrubber`] with a hand-picked detector set
#[derive(Default)]
pub struct ScrubberBuilder {
    detectors: Vec<Box<dyn Detector>>,
    policy: ResolutionPolicy,
    min_confidence: f32,
}

impl ScrubberBuilder {
    /// Register a detector
    pub fn with_detector(mut self, detector: impl Detector + 'static) -> Self {
        self.detectors.push(Box::new(detector));
        self
    }

    /// Register every detector from a config section
    pub fn with_detectors(mut self, config: &DetectorConfig) -> Result<Self> {
        self.detectors.extend(config.build()?);
        Ok(self)
    }

    pub fn with_policy(mut self, policy: ResolutionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Drop candidates below this confidence before resolution
    pub fn with_min_confidence(mut self, min_confidence: f32) -> Self {
        self.min_confidence = min_confidence;
        self
    }

    pub fn build(self) -> Scrubber {
        Scrubber {
            detectors: self.detectors,
            policy: self.policy,
            min_confidence: self.min_confidence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::{CustomPattern, EmailDetector, PatternDetector, PhoneDetector};

    /// Emits a fixed candidate list regardless of input
    struct FixedDetector {
        category: Category,
        spans: Vec<Span>,
    }

    impl Detector for FixedDetector {
        fn category(&self) -> Category {
            self.category.clone()
        }

        fn detect(&self, _text: &str) -> Vec<Span> {
            self.spans.clone()
        }
    }

    #[test]
    fn test_scrub_email() {
        let scrubber = Scrubber::default_set().unwrap();
        let result = scrubber.scrub("Contact me at test@example.com", Some("e-1"));

        assert_eq!(result.id, "e-1");
        assert_eq!(result.redacted_text, "Contact me at [EMAIL]");
        assert_eq!(result.categories_found, vec![Category::Email]);
        assert_eq!(result.scrubber_version, "v1");
    }

    #[test]
    fn test_default_id() {
        let scrubber = Scrubber::default_set().unwrap();
        assert_eq!(scrubber.scrub("nothing here", None).id, DEFAULT_RECORD_ID);
    }

    #[test]
    fn test_builder_with_selected_detectors() {
        let scrubber = Scrubber::builder()
            .with_detector(EmailDetector::new().unwrap())
            .with_detector(PhoneDetector::new().unwrap())
            .build();

        assert_eq!(scrubber.categories(), vec![Category::Email, Category::Phone]);
        assert_eq!(scrubber.policy(), ResolutionPolicy::EarliestStart);

        // DOB is not registered, so the date stays
        let result = scrubber.scrub("DOB 12/08/1995, mail a@b.io", None);
        assert_eq!(result.redacted_text, "DOB 12/08/1995, mail [EMAIL]");
    }

    #[test]
    fn test_categories_found_sorted_and_deduplicated() {
        let scrubber = Scrubber::default_set().unwrap();
        let result = scrubber.scrub(
            "x@y.com, DOB 01/02/1990, z@w.org, call 9876543210",
            None,
        );

        assert_eq!(
            result.categories_found,
            vec![Category::Dob, Category::Email, Category::Phone]
        );
        assert_eq!(result.resolved_spans.len(), 4);
    }

    #[test]
    fn test_min_confidence_filters_candidates() {
        let text = "seen on 25.12.2023";
        let lenient = Scrubber::builder()
            .with_detectors(&DetectorConfig::default())
            .unwrap()
            .build();
        let strict = Scrubber::builder()
            .with_detectors(&DetectorConfig::default())
            .unwrap()
            .with_min_confidence(0.9)
            .build();

        assert_eq!(lenient.scrub(text, None).redacted_text, "seen on [DOB]");
        assert_eq!(strict.scrub(text, None).redacted_text, text);
    }

    #[test]
    fn test_detector_order_does_not_matter() {
        let a = FixedDetector {
            category: Category::Name,
            spans: vec![Span::new(Category::Name, 0, 4, 0.7)],
        };
        let b = FixedDetector {
            category: Category::GovernmentId,
            spans: vec![Span::new(Category::GovernmentId, 0, 6, 0.9)],
        };
        let a2 = FixedDetector {
            category: Category::Name,
            spans: a.spans.clone(),
        };
        let b2 = FixedDetector {
            category: Category::GovernmentId,
            spans: b.spans.clone(),
        };

        let forward = Scrubber::builder().with_detector(a).with_detector(b).build();
        let backward = Scrubber::builder().with_detector(b2).with_detector(a2).build();

        let text = "ABCDEFGH";
        assert_eq!(forward.scrub(text, None), backward.scrub(text, None));
        assert_eq!(forward.scrub(text, None).redacted_text, "[GOVERNMENT_ID]GH");
    }

    #[test]
    fn test_custom_detector_priority_decides_ties() {
        let text = "ref 2024-55";
        let start = 4;
        let scrubber = Scrubber::builder()
            .with_detector(FixedDetector {
                category: Category::AppointmentId,
                spans: vec![Span::new(Category::AppointmentId, start, text.len(), 0.9)],
            })
            .with_detector(
                PatternDetector::new(Category::custom("ticket"), r"\d{4}-\d{2}", 0.5)
                    .unwrap()
                    .with_priority(100),
            )
            .build();

        assert_eq!(scrubber.scrub(text, None).redacted_text, "ref [TICKET]");
    }

    #[test]
    fn test_priorities_report_configured_values() {
        let config = DetectorConfig {
            custom_patterns: vec![CustomPattern {
                name: "mrn".to_string(),
                pattern: r"MRN\d{6}".to_string(),
                confidence: 0.8,
                priority: Some(92),
            }],
            ..DetectorConfig::default()
        };
        let scrubber = Scrubber::builder()
            .with_detector(EmailDetector::new().unwrap())
            .with_detectors(&config)
            .unwrap()
            .build();

        let priorities = scrubber.priorities();
        assert_eq!(priorities[0], (Category::Email, 80));
        assert_eq!(priorities.last(), Some(&(Category::custom("mrn"), 92)));

        let text = "chart MRN123456";
        let spans = scrubber.scrub(text, None).resolved_spans;
        assert_eq!(spans[0].priority, 92);
    }

    #[test]
    fn test_policy_changes_outcome() {
        let name = Span::new(Category::Name, 0, 10, 0.7);
        let dob = Span::new(Category::Dob, 6, 16, 0.9);
        let build = |policy| {
            Scrubber::builder()
                .with_detector(FixedDetector {
                    category: Category::Name,
                    spans: vec![name.clone()],
                })
                .with_detector(FixedDetector {
                    category: Category::Dob,
                    spans: vec![dob.clone()],
                })
                .with_policy(policy)
                .build()
        };

        let text = "0123456789ABCDEF";
        assert_eq!(
            build(ResolutionPolicy::EarliestStart).scrub(text, None).redacted_text,
            "[NAME]ABCDEF"
        );
        assert_eq!(
            build(ResolutionPolicy::PriorityFirst).scrub(text, None).redacted_text,
            "012345[DOB]"
        );
    }
}
