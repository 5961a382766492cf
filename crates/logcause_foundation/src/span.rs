//! Text intervals tagged with the regex fragment that matches them.
//!
//! A [`Span`] covers the half-open byte range `[start, end)` of a sample
//! line. Parameter spans become capturing groups when a regex is rebuilt
//! from spans; literal spans fill the gaps between them.

use crate::error::{Error, ErrorKind, Result};

/// A span of line text.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Span {
    /// Byte offset where this span starts.
    pub start: usize,
    /// Byte offset where this span ends (exclusive).
    pub end: usize,
    /// Regex fragment matching the covered text.
    pub pattern: String,
    /// Whether the span is captured as a parameter group.
    pub is_param: bool,
}

impl Span {
    /// Creates a new span.
    #[must_use]
    pub fn new(start: usize, end: usize, pattern: impl Into<String>, is_param: bool) -> Self {
        Self {
            start,
            end,
            pattern: pattern.into(),
            is_param,
        }
    }

    /// Creates a parameter span.
    #[must_use]
    pub fn param(start: usize, end: usize, pattern: impl Into<String>) -> Self {
        Self::new(start, end, pattern, true)
    }

    /// Creates a literal (non-parameter) span.
    #[must_use]
    pub fn literal(start: usize, end: usize, pattern: impl Into<String>) -> Self {
        Self::new(start, end, pattern, false)
    }

    /// Returns the length of this span in bytes, 0 when `end < start`.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns true if this span is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Returns true if `other` lies entirely inside this span.
    #[must_use]
    pub const fn contains(&self, other: &Self) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Returns true if the two spans share at least one byte.
    #[must_use]
    pub const fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Returns the text this span covers in the given source.
    ///
    /// A span that is reversed, runs past the end of `source` or splits a
    /// character covers no text.
    #[must_use]
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        source.get(self.start..self.end).unwrap_or_default()
    }

    /// Checks `start < end` and that the span lies inside `[total_start, total_end)`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSpan` otherwise.
    pub fn check_within(&self, total_start: usize, total_end: usize) -> Result<()> {
        if self.start < self.end && total_start <= self.start && self.end <= total_end {
            Ok(())
        } else {
            Err(Error::new(ErrorKind::InvalidSpan {
                start: self.start,
                end: self.end,
                total_start,
                total_end,
            }))
        }
    }
}

/// Stable sort by `(start, end)` ascending.
pub fn sort_spans(spans: &mut [Span]) {
    spans.sort_by_key(|s| (s.start, s.end));
}

/// Drops every span that is contained in another one.
///
/// Spans are sorted first. When two spans are equal only one is kept.
///
/// # Errors
///
/// Returns `OverlappingSpans` when two spans cross without one containing
/// the other.
pub fn remove_overlaps(mut spans: Vec<Span>) -> Result<Vec<Span>> {
    sort_spans(&mut spans);
    let mut kept: Vec<Span> = Vec::with_capacity(spans.len());
    for span in spans {
        while kept.last().is_some_and(|last| span.contains(last)) {
            kept.pop();
        }
        match kept.last() {
            Some(last) if last.contains(&span) => {}
            Some(last) if last.overlaps(&span) => {
                return Err(Error::new(ErrorKind::OverlappingSpans {
                    first: (last.start, last.end),
                    second: (span.start, span.end),
                }));
            }
            _ => kept.push(span),
        }
    }
    Ok(kept)
}

/// Returns literal spans for every gap of `[total_start, total_end)` not
/// covered by `spans`.
///
/// `spans` must be sorted and free of overlaps (see [`remove_overlaps`]).
/// `literal` builds the regex fragment for a gap from its offsets.
///
/// # Errors
///
/// Returns `InvalidSpan` if a span falls outside the interval, and
/// `OverlappingSpans` if two spans overlap.
pub fn complement<F>(
    spans: &[Span],
    total_start: usize,
    total_end: usize,
    literal: F,
) -> Result<Vec<Span>>
where
    F: Fn(usize, usize) -> String,
{
    let mut gaps = Vec::new();
    let mut cursor = total_start;
    let mut previous: Option<&Span> = None;
    for span in spans {
        span.check_within(total_start, total_end)?;
        if let Some(prev) = previous.filter(|prev| prev.end > span.start) {
            return Err(Error::new(ErrorKind::OverlappingSpans {
                first: (prev.start, prev.end),
                second: (span.start, span.end),
            }));
        }
        if cursor < span.start {
            gaps.push(Span::literal(cursor, span.start, literal(cursor, span.start)));
        }
        cursor = span.end;
        previous = Some(span);
    }
    if cursor < total_end {
        gaps.push(Span::literal(cursor, total_end, literal(cursor, total_end)));
    }
    Ok(gaps)
}
