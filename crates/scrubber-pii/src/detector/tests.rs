//! Tests for the detector set

use super::*;

#[test]
fn test_detector_config_default() {
    let config = DetectorConfig::default();

    assert!(config.detect_email);
    assert!(config.detect_phone);
    assert!(config.detect_dob);
    assert!(config.detect_government_id);
    assert!(config.detect_appointment_id);
    assert!(config.detect_insurance_id);
    assert!(config.detect_provider);
    assert!(config.detect_address);
    assert!(config.detect_name);
    assert_eq!(config.custom_patterns.len(), 0);
}

#[test]
fn test_build_all_builtins() {
    let detectors = DetectorConfig::default().build().unwrap();
    let categories: Vec<Category> = detectors.iter().map(|d| d.category()).collect();

    assert_eq!(detectors.len(), Category::BUILTIN.len());
    for category in Category::BUILTIN {
        assert!(categories.contains(&category), "missing {category}");
    }
}

#[test]
fn test_build_respects_toggles_and_custom_patterns() {
    let config = DetectorConfig {
        detect_phone: false,
        detect_name: false,
        custom_patterns: vec![CustomPattern {
            name: "mrn".to_string(),
            pattern: r"MRN\d{6}".to_string(),
            confidence: 0.9,
            priority: None,
        }],
        ..DetectorConfig::default()
    };

    let categories: Vec<Category> = config
        .build()
        .unwrap()
        .iter()
        .map(|d| d.category())
        .collect();

    assert!(!categories.contains(&Category::Phone));
    assert!(!categories.contains(&Category::Name));
    assert_eq!(categories.last(), Some(&Category::custom("MRN")));
}

#[test]
fn test_build_fails_on_invalid_custom_pattern() {
    let config = DetectorConfig {
        custom_patterns: vec![CustomPattern {
            name: "bad".to_string(),
            pattern: "[".to_string(),
            confidence: 0.9,
            priority: None,
        }],
        ..DetectorConfig::default()
    };

    assert!(matches!(config.build(), Err(Error::InvalidPattern { .. })));
}

#[test]
fn test_detector_config_deserialization_fills_defaults() {
    let config: DetectorConfig = serde_json::from_str(
        r#"{"detect_address": false, "custom_patterns": [{"name": "ward", "pattern": "Ward \\d+"}]}"#,
    )
    .unwrap();

    assert!(!config.detect_address);
    assert!(config.detect_email);
    assert_eq!(config.custom_patterns[0].confidence, 0.8);
    assert_eq!(config.custom_patterns[0].priority, None);
}

#[test]
fn test_detectors_tolerate_awkward_input() {
    let detectors = DetectorConfig::default().build().unwrap();
    let inputs = [
        "",
        " ",
        "\u{0}\u{1}\u{7f}",
        "😀 +91 😀 98765 😀 43210 😀",
        "日本語のテキスト 12/08/1995 ここ",
        "@@@@....----(((())))",
        "Dr. ",
        "12 ",
        "my name is",
        "policy no:",
    ];

    for detector in &detectors {
        for input in inputs {
            for span in detector.detect(input) {
                assert!(span.start < span.end);
                assert!(span.end <= input.len());
                assert!(input.is_char_boundary(span.start));
                assert!(input.is_char_boundary(span.end));
                assert_eq!(span.category, detector.category());
            }
        }
    }
}

#[test]
fn test_word_boundary_helpers() {
    let text = "a 12 é";
    assert!(word_char_before(text, 1));
    assert!(!word_char_before(text, 2));
    assert!(!word_char_before(text, 0));
    assert!(word_char_after(text, 5));
    assert!(!word_char_after(text, text.len()));
    assert_eq!(digit_count("+91 (987) 65-43"), 9);
}
