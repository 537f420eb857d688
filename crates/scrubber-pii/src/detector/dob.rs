//! Date of birth detector

use super::Detector;
use crate::span::{Category, Span};
use aho_corasick::AhoCorasick;
use regex::Regex;

/// Confidence when a birth keyword precedes the date
const KEYWORD_CONFIDENCE: f32 = 0.95;

/// Confidence for a bare date
const BARE_CONFIDENCE: f32 = 0.7;

/// Bytes before a date searched for a birth keyword
const KEYWORD_WINDOW: usize = 24;

const BIRTH_KEYWORDS: [&str; 6] = ["dob", "d.o.b", "date of birth", "born", "birthday", "birth date"];

const MONTHS: &str = "jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?";

/// Detects calendar dates and scores them higher near birth keywords
pub struct DobDetector {
    numeric: Regex,
    iso: Regex,
    written: Regex,
    keywords: AhoCorasick,
}

impl DobDetector {
    pub fn new() -> Result<Self, regex::Error> {
        // 12/08/1995, 3-7-2001, 25.12.1989
        let numeric = Regex::new(r"\b(\d{1,2})[/.\-](\d{1,2})[/.\-](?:19|20)\d{2}\b")?;

        // 1995-08-12
        let iso = Regex::new(r"\b(?:19|20)\d{2}-(?:0[1-9]|1[0-2])-(?:0[1-9]|[12]\d|3[01])\b")?;

        // 12 August 1995, 3rd Jan 2001, Aug 12, 1995
        let written = Regex::new(&format!(
            r"(?i)\b(?:\d{{1,2}}(?:st|nd|rd|th)?\s+(?:{MONTHS})\.?,?|(?:{MONTHS})\.?\s+\d{{1,2}}(?:st|nd|rd|th)?,?)\s+(?:19|20)\d{{2}}\b"
        ))?;

        let keywords = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build(BIRTH_KEYWORDS)
            .map_err(|e| regex::Error::Syntax(e.to_string()))?;

        Ok(Self {
            numeric,
            iso,
            written,
            keywords,
        })
    }

    fn confidence_at(&self, text: &str, start: usize) -> f32 {
        let mut window_start = start.saturating_sub(KEYWORD_WINDOW);
        while !text.is_char_boundary(window_start) {
            window_start -= 1;
        }

        if self.keywords.is_match(&text[window_start..start]) {
            KEYWORD_CONFIDENCE
        } else {
            BARE_CONFIDENCE
        }
    }
}

/// Day and month parts must both be plausible and one of them a month
fn valid_day_month(first: &str, second: &str) -> bool {
    let (Ok(a), Ok(b)) = (first.parse::<u32>(), second.parse::<u32>()) else {
        return false;
    };
    (1..=31).contains(&a) && (1..=31).contains(&b) && (a <= 12 || b <= 12)
}

impl Detector for DobDetector {
    fn category(&self) -> Category {
        Category::Dob
    }

    fn detect(&self, text: &str) -> Vec<Span> {
        let mut ranges = Vec::new();

        for caps in self.numeric.captures_iter(text) {
            if let (Some(whole), Some(first), Some(second)) = (caps.get(0), caps.get(1), caps.get(2))
                && valid_day_month(first.as_str(), second.as_str())
            {
                ranges.push((whole.start(), whole.end()));
            }
        }
        ranges.extend(self.iso.find_iter(text).map(|m| (m.start(), m.end())));
        ranges.extend(self.written.find_iter(text).map(|m| (m.start(), m.end())));

        ranges.sort_unstable();
        ranges.dedup();

        ranges
            .into_iter()
            .map(|(start, end)| Span::new(Category::Dob, start, end, self.confidence_at(text, start)))
            .collect()
    }
}
