use crate::block::InlineSpan;

/// A matcher inspects the start of the remaining text and, on success,
/// returns the span it recognized plus the number of bytes it consumed.
type Matcher = fn(&str) -> Option<(InlineSpan, usize)>;

/// Tried in order at every position; the first hit wins.
/// Bold must come before italic since both start with `*`.
const MATCHERS: [Matcher; 4] = [match_bold, match_italic, match_code, match_link];

const MARKERS: [char; 3] = ['*', '`', '['];

/// Split a run of text into inline spans, scanning left to right.
pub fn parse_inline(text: &str) -> Vec<InlineSpan> {
    let mut spans = Vec::new();
    let mut rest = text;

    while !rest.is_empty() {
        if let Some((span, consumed)) = MATCHERS.iter().find_map(|matcher| matcher(rest)) {
            spans.push(span);
            rest = &rest[consumed..];
            continue;
        }

        // No pattern here. A marker at position 0 that failed to open a span
        // is plain text, so start looking for the next marker after it.
        let skip = match rest.chars().next() {
            Some(c) if MARKERS.contains(&c) => c.len_utf8(),
            _ => 0,
        };
        let end = rest[skip..]
            .find(MARKERS)
            .map_or(rest.len(), |pos| skip + pos);
        spans.push(InlineSpan::PlainText(rest[..end].to_string()));
        rest = &rest[end..];
    }

    spans
}

/// Like [`parse_inline`], but never returns an empty sequence: empty text
/// comes back as a single plain-text span holding the raw input.
pub fn inline_spans(text: &str) -> Vec<InlineSpan> {
    let spans = parse_inline(text);
    if spans.is_empty() {
        vec![InlineSpan::PlainText(text.to_string())]
    } else {
        spans
    }
}

fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// Find the nearest `close` that leaves at least one character of body in
/// front of it. Returns the body and the byte offset of `close` in `text`.
fn enclosed<'a>(text: &'a str, close: &str) -> Option<(&'a str, usize)> {
    let first = text.chars().next()?;
    if is_line_terminator(first) {
        return None;
    }
    let from = first.len_utf8();
    let end = from + text[from..].find(close)?;
    let body = &text[..end];
    if body.chars().any(is_line_terminator) {
        return None;
    }
    Some((body, end))
}

fn delimited<'a>(text: &'a str, delimiter: &str) -> Option<(&'a str, usize)> {
    let inner = text.strip_prefix(delimiter)?;
    let (body, end) = enclosed(inner, delimiter)?;
    Some((body, delimiter.len() + end + delimiter.len()))
}

fn match_bold(text: &str) -> Option<(InlineSpan, usize)> {
    delimited(text, "**").map(|(body, len)| (InlineSpan::Bold(body.to_string()), len))
}

fn match_italic(text: &str) -> Option<(InlineSpan, usize)> {
    delimited(text, "*").map(|(body, len)| (InlineSpan::Italic(body.to_string()), len))
}

fn match_code(text: &str) -> Option<(InlineSpan, usize)> {
    delimited(text, "`").map(|(body, len)| (InlineSpan::Code(body.to_string()), len))
}

/// `[label](href)`. The label ends at the first `](`; both parts need at
/// least one character. If the target after that `](` is unusable, no later
/// `](` can yield one either, so there is a single attempt.
fn match_link(text: &str) -> Option<(InlineSpan, usize)> {
    let inner = text.strip_prefix('[')?;
    let first = inner.chars().next()?;
    if is_line_terminator(first) {
        return None;
    }

    let from = first.len_utf8();
    let label_end = from + inner[from..].find("](")?;
    let label = &inner[..label_end];
    if label.chars().any(is_line_terminator) {
        return None;
    }

    let (href, href_end) = enclosed(&inner[label_end + 2..], ")")?;
    let consumed = 1 + label_end + 2 + href_end + 1;
    let span = InlineSpan::Link {
        label: label.to_string(),
        href: href.to_string(),
    };
    Some((span, consumed))
}
