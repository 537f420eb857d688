//! Overlap resolution
//!
//! Turns the union of candidate spans from every detector into a single
//! non-overlapping set. Resolution only filters: every returned span is one
//! of the candidates, unchanged.

use crate::span::Span;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::str::FromStr;

/// Order in which conflicting candidates are considered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionPolicy {
    /// Left-to-right greedy: sort by start, then priority, then length.
    ///
    /// An earlier span blocks any later overlapping span, even one with a
    /// higher priority. Priority only decides between equal starts.
    #[default]
    EarliestStart,

    /// Priority wins every conflict: sort by priority, then length, then
    /// start, accept greedily and return the survivors in start order.
    PriorityFirst,
}

impl ResolutionPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionPolicy::EarliestStart => "earliest_start",
            ResolutionPolicy::PriorityFirst => "priority_first",
        }
    }
}

impl FromStr for ResolutionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "earliest_start" => Ok(ResolutionPolicy::EarliestStart),
            "priority_first" => Ok(ResolutionPolicy::PriorityFirst),
            other => Err(format!(
                "Invalid resolution policy '{}'. Use 'earliest_start' or 'priority_first'",
                other
            )),
        }
    }
}

impl std::fmt::Display for ResolutionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolve overlapping spans into a non-overlapping set sorted by start.
///
/// Candidates are ordered by the policy's composite key using a stable sort,
/// so candidates with equal keys keep their insertion order. Each candidate
/// is then accepted unless it overlaps an already accepted span. The overlap
/// scan is quadratic in the candidate count, which stays small per record.
pub fn resolve_overlaps(mut spans: Vec<Span>, policy: ResolutionPolicy) -> Vec<Span> {
    match policy {
        ResolutionPolicy::EarliestStart => {
            spans.sort_by_key(|s| (s.start, Reverse(s.priority), Reverse(s.len())));
        }
        ResolutionPolicy::PriorityFirst => {
            spans.sort_by_key(|s| (Reverse(s.priority), Reverse(s.len()), s.start));
        }
    }

    let mut resolved: Vec<Span> = Vec::with_capacity(spans.len());
    for span in spans {
        if span.is_empty() {
            continue;
        }
        if !resolved.iter().any(|kept| kept.overlaps(&span)) {
            resolved.push(span);
        }
    }

    if policy == ResolutionPolicy::PriorityFirst {
        resolved.sort_by_key(|s| s.start);
    }

    resolved
}
