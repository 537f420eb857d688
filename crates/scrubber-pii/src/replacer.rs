//! Placeholder replacement

use crate::span::Span;

/// Replace each span in `text` with its category placeholder, e.g. `[EMAIL]`.
///
/// Spans are expected to be non-overlapping and sorted ascending by start,
/// as returned by [`crate::resolve_overlaps`]. A span that starts before the
/// end of the previous one, or whose offsets do not fit `text`, is skipped
/// rather than applied.
pub fn replace_spans(text: &str, spans: &[Span]) -> String {
    if spans.is_empty() {
        return text.to_string();
    }

    let mut result = String::with_capacity(text.len());
    let mut last_end = 0;

    for span in spans {
        if span.start < last_end {
            continue;
        }
        let (Some(before), Some(_)) = (text.get(last_end..span.start), span.as_str(text)) else {
            continue;
        };

        // Add text before this span, then its placeholder
        result.push_str(before);
        result.push('[');
        result.push_str(span.category.as_str());
        result.push(']');

        last_end = span.end;
    }

    // Add remaining text
    result.push_str(&text[last_end..]);

    result
}
