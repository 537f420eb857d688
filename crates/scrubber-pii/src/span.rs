//! Span and record data model

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Identifier echoed back when a record arrives without one
pub const DEFAULT_RECORD_ID: &str = "unknown";

/// Version tag stamped on every result
pub const SCRUBBER_VERSION: &str = "v1";

/// Priority given to custom categories that do not configure their own
pub const DEFAULT_CUSTOM_PRIORITY: u32 = 50;

/// Category of sensitive data a span was detected as
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Category {
    /// Email address
    Email,

    /// Phone number
    Phone,

    /// Date of birth
    Dob,

    /// Government issued identifier (Aadhaar, PAN, SSN, passport)
    GovernmentId,

    /// Appointment or booking reference
    AppointmentId,

    /// Insurance policy or member number
    InsuranceId,

    /// Healthcare provider or facility
    Provider,

    /// Street address
    Address,

    /// Personal name
    Name,

    /// User-configured pattern, label is upper-case
    Custom(String),
}

impl Category {
    /// Every built-in category, highest priority first
    pub const BUILTIN: [Category; 9] = [
        Category::GovernmentId,
        Category::Dob,
        Category::AppointmentId,
        Category::InsuranceId,
        Category::Email,
        Category::Phone,
        Category::Address,
        Category::Provider,
        Category::Name,
    ];

    /// Build a custom category, normalising the label to upper-case.
    ///
    /// A label that names a built-in category resolves to that category.
    pub fn custom(name: &str) -> Self {
        let label = name.trim().to_ascii_uppercase().replace([' ', '-'], "_");
        Self::builtin_from_label(&label).unwrap_or(Category::Custom(label))
    }

    fn builtin_from_label(label: &str) -> Option<Self> {
        Self::BUILTIN.into_iter().find(|c| c.as_str() == label)
    }

    /// Label used in placeholders and serialized output
    pub fn as_str(&self) -> &str {
        match self {
            Category::Email => "EMAIL",
            Category::Phone => "PHONE",
            Category::Dob => "DOB",
            Category::GovernmentId => "GOVERNMENT_ID",
            Category::AppointmentId => "APPOINTMENT_ID",
            Category::InsuranceId => "INSURANCE_ID",
            Category::Provider => "PROVIDER",
            Category::Address => "ADDRESS",
            Category::Name => "NAME",
            Category::Custom(label) => label,
        }
    }

    /// Resolution weight from the category policy table
    pub fn default_priority(&self) -> u32 {
        match self {
            Category::GovernmentId => 95,
            Category::Dob => 90,
            Category::AppointmentId => 88,
            Category::InsuranceId => 87,
            Category::Email => 80,
            Category::Phone => 75,
            Category::Address | Category::Provider => 70,
            Category::Name => 60,
            Category::Custom(_) => DEFAULT_CUSTOM_PRIORITY,
        }
    }

    /// Token substituted for a resolved span, e.g. `[EMAIL]`
    pub fn placeholder(&self) -> String {
        format!("[{}]", self.as_str())
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Category::Custom(_))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err("category label must not be empty".to_string());
        }
        Ok(Category::custom(s))
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.as_str().to_string()
    }
}

impl TryFrom<String> for Category {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// Sorted output is alphabetical by label.
impl Ord for Category {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_str()
            .cmp(other.as_str())
            .then_with(|| self.is_custom().cmp(&other.is_custom()))
    }
}

impl PartialOrd for Category {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A detected sensitive substring
///
/// Offsets are UTF-8 byte offsets into the source text and always fall on
/// character boundaries. The range is half-open: `[start, end)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    /// Category of the detected data
    pub category: Category,

    /// Start position in the text
    pub start: usize,

    /// End position in the text (exclusive)
    pub end: usize,

    /// Detector's self-reported certainty (0.0 to 1.0)
    pub confidence: f32,

    /// Conflict resolution weight, higher wins
    pub priority: u32,
}

impl Span {
    /// Create a span with the category's default priority
    pub fn new(category: Category, start: usize, end: usize, confidence: f32) -> Self {
        debug_assert!(start < end, "span must be non-empty: {start}..{end}");
        let priority = category.default_priority();
        Self {
            category,
            start,
            end,
            confidence: confidence.clamp(0.0, 1.0),
            priority,
        }
    }

    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Half-open overlap test: `[a,b)` and `[c,d)` overlap iff `a < d && c < b`
    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// The covered substring, if the offsets are valid for `text`
    pub fn as_str<'a>(&self, text: &'a str) -> Option<&'a str> {
        text.get(self.start..self.end)
    }
}

/// Scrubbed output for a single record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordResult {
    /// Caller supplied identifier, echoed back unchanged
    pub id: String,

    /// Text with every resolved span replaced by its placeholder
    pub redacted_text: String,

    /// Non-overlapping spans that were applied, ascending by start
    pub resolved_spans: Vec<Span>,

    /// Distinct categories present in `resolved_spans`, sorted
    pub categories_found: Vec<Category>,

    pub scrubber_version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_labels() {
        assert_eq!(Category::GovernmentId.as_str(), "GOVERNMENT_ID");
        assert_eq!(Category::Dob.placeholder(), "[DOB]");
        assert_eq!(Category::custom("api key").as_str(), "API_KEY");
        assert_eq!(Category::custom("email"), Category::Email);
    }

    #[test]
    fn test_priority_table() {
        let priorities: Vec<u32> = Category::BUILTIN
            .iter()
            .map(Category::default_priority)
            .collect();
        assert_eq!(priorities, vec![95, 90, 88, 87, 80, 75, 70, 70, 60]);
        assert_eq!(
            Category::custom("employee_id").default_priority(),
            DEFAULT_CUSTOM_PRIORITY
        );
    }

    #[test]
    fn test_category_serialization() {
        let json = serde_json::to_string(&Category::AppointmentId).unwrap();
        assert_eq!(json, "\"APPOINTMENT_ID\"");

        let parsed: Category = serde_json::from_str("\"INSURANCE_ID\"").unwrap();
        assert_eq!(parsed, Category::InsuranceId);

        let custom: Category = serde_json::from_str("\"badge\"").unwrap();
        assert_eq!(custom, Category::Custom("BADGE".to_string()));

        assert!(serde_json::from_str::<Category>("\"  \"").is_err());
    }

    #[test]
    fn test_category_ordering_is_alphabetical() {
        let mut categories = vec![Category::Phone, Category::Address, Category::Email];
        categories.sort();
        assert_eq!(
            categories,
            vec![Category::Address, Category::Email, Category::Phone]
        );
    }

    #[test]
    fn test_span_overlap() {
        let a = Span::new(Category::Email, 0, 10, 0.9);
        let b = Span::new(Category::Phone, 9, 12, 0.9);
        let c = Span::new(Category::Phone, 10, 12, 0.9);

        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        // Touching ranges do not overlap
        assert!(!a.overlaps(&c));
        assert_eq!(a.len(), 10);
        assert_eq!(a.priority, 80);
    }

    #[test]
    fn test_span_text() {
        let text = "mail test@example.com";
        let span = Span::new(Category::Email, 5, 21, 0.95);
        assert_eq!(span.as_str(text), Some("test@example.com"));
        assert_eq!(Span::new(Category::Email, 5, 40, 0.95).as_str(text), None);
    }
}
