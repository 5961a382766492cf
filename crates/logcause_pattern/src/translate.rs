//! Regex/span translation.
//!
//! A regex and a sample line together determine which parts of the line
//! are parameters. [`spans_from_regex`] recovers those parameter spans and
//! [`regex_from_spans`] rebuilds a regex from them.
//!
//! Matching is always done against the anchored form `^(?:regex)$`, so a
//! regex only counts as matching when it covers the whole line.

use logcause_foundation::span::{complement, remove_overlaps};
use logcause_foundation::{Error, ErrorKind, Result, Span};
use regex::Regex;

/// Character class of a run produced by [`char_runs`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum RunClass {
    Alpha,
    Digit,
    Other,
}

/// A maximal run of characters of one class: `(class, start, end)`.
pub(crate) type Run = (RunClass, usize, usize);

fn classify(c: char) -> RunClass {
    if c.is_ascii_alphabetic() {
        RunClass::Alpha
    } else if c.is_ascii_digit() {
        RunClass::Digit
    } else {
        RunClass::Other
    }
}

/// Splits `text` into maximal runs of ASCII letters, ASCII digits, and
/// everything else.
pub(crate) fn char_runs(text: &str) -> Vec<Run> {
    let mut runs: Vec<Run> = Vec::new();
    for (offset, c) in text.char_indices() {
        let class = classify(c);
        let end = offset + c.len_utf8();
        match runs.last_mut() {
            Some((last, _, last_end)) if *last == class => *last_end = end,
            _ => runs.push((class, offset, end)),
        }
    }
    runs
}

/// Compiles `regex` anchored to the whole text.
///
/// # Errors
///
/// Returns `InvalidRegex` if the regex does not compile.
pub fn compile_anchored(regex: &str) -> Result<Regex> {
    Regex::new(&format!("^(?:{regex})$")).map_err(|e| Error::invalid_regex(regex, e.to_string()))
}

/// Returns `regex` anchored to the whole text.
///
/// A leading `^` and a trailing end-of-text `$` are kept. The body is
/// wrapped as `^(?:body)$` when it has a top-level alternation, so the
/// stored form matches exactly what [`compile_anchored`] matches.
#[must_use]
pub fn anchor(regex: &str) -> String {
    let shape = TopLevelShape::scan(regex);
    let body = regex.strip_prefix('^').unwrap_or(regex);
    let body = if shape.ends_with_anchor {
        body.strip_suffix('$').unwrap_or(body)
    } else {
        body
    };
    if shape.has_alternation {
        format!("^(?:{body})$")
    } else {
        format!("^{body}$")
    }
}

/// What a regex looks like outside of its groups and classes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct TopLevelShape {
    /// An unescaped `|` outside any group or class.
    has_alternation: bool,
    /// The last token is an unescaped `$` outside any class.
    ends_with_anchor: bool,
}

impl TopLevelShape {
    fn scan(regex: &str) -> Self {
        let chars: Vec<(usize, char)> = regex.char_indices().collect();
        let mut shape = Self::default();
        let mut depth = 0usize;
        let mut class_depth = 0usize;
        let mut class_literal_at = usize::MAX;
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i].1;
            shape.ends_with_anchor = false;
            if c == '\\' {
                i += 2;
                continue;
            }
            if class_depth > 0 {
                match c {
                    '[' => {
                        class_depth += 1;
                        class_literal_at = after_class_open(&chars, i);
                    }
                    ']' if i != class_literal_at => class_depth -= 1,
                    _ => {}
                }
                i += 1;
                continue;
            }
            match c {
                '[' => {
                    class_depth = 1;
                    class_literal_at = after_class_open(&chars, i);
                }
                '(' => depth += 1,
                ')' => depth = depth.saturating_sub(1),
                '|' if depth == 0 => shape.has_alternation = true,
                '$' => shape.ends_with_anchor = true,
                _ => {}
            }
            i += 1;
        }
        shape
    }
}

/// Checks that `regex` matches the whole of `text` and returns the content
/// of every capture group (empty for groups that did not participate).
///
/// # Errors
///
/// Returns `InvalidRegex` if the regex does not compile and
/// `NotMatchingRegex` if it does not match the whole text.
pub fn verify_regex(regex: &str, text: &str) -> Result<Vec<String>> {
    let compiled = compile_anchored(regex)?;
    let captures = compiled
        .captures(text)
        .ok_or_else(|| Error::not_matching_regex(regex, text))?;
    Ok(captures
        .iter()
        .skip(1)
        .map(|m| m.map_or_else(String::new, |m| m.as_str().to_string()))
        .collect())
}

/// Returns the content of every capture group of `regex` matched against `text`.
///
/// # Errors
///
/// Same as [`verify_regex`].
pub fn regex_groups(regex: &str, text: &str) -> Result<Vec<String>> {
    verify_regex(regex, text)
}

/// Location of one capturing group inside the regex source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct GroupSource {
    /// Offset of the opening parenthesis.
    pub open: usize,
    /// Offset where the group body starts (after any `?P<name>` prefix).
    pub body_start: usize,
    /// Offset of the closing parenthesis.
    pub close: usize,
}

/// Finds every capturing group of `regex` in left-parenthesis order, which
/// is the order of capture group numbers.
///
/// Escaped parentheses, parentheses inside character classes and
/// non-capturing groups are skipped.
pub(crate) fn capture_group_sources(regex: &str) -> Vec<GroupSource> {
    let chars: Vec<(usize, char)> = regex.char_indices().collect();
    let mut stack: Vec<Option<(usize, usize)>> = Vec::new();
    let mut groups = Vec::new();
    let mut class_depth = 0usize;
    // Index at which a `]` is still literal (first char of a class).
    let mut class_literal_at = usize::MAX;
    let mut i = 0;

    while i < chars.len() {
        let (offset, c) = chars[i];
        if c == '\\' {
            i += 2;
            continue;
        }
        if class_depth > 0 {
            match c {
                '[' => {
                    class_depth += 1;
                    class_literal_at = after_class_open(&chars, i);
                }
                ']' if i != class_literal_at => class_depth -= 1,
                _ => {}
            }
            i += 1;
            continue;
        }
        match c {
            '[' => {
                class_depth = 1;
                class_literal_at = after_class_open(&chars, i);
            }
            '(' => stack.push(capturing_body_start(&chars, i).map(|body| (offset, body))),
            ')' => {
                if let Some(Some((open, body_start))) = stack.pop() {
                    groups.push(GroupSource {
                        open,
                        body_start,
                        close: offset,
                    });
                }
            }
            _ => {}
        }
        i += 1;
    }

    groups.sort_by_key(|g| g.open);
    groups
}

fn after_class_open(chars: &[(usize, char)], open: usize) -> usize {
    match chars.get(open + 1) {
        Some((_, '^')) => open + 2,
        _ => open + 1,
    }
}

/// Returns the body offset of the group opened at `open`, or `None` when
/// the group does not capture.
fn capturing_body_start(chars: &[(usize, char)], open: usize) -> Option<usize> {
    let offset_at = |idx: usize| chars.get(idx).map(|(o, _)| *o);
    match chars.get(open + 1) {
        Some((_, '?')) => {}
        Some((body, _)) => return Some(*body),
        None => return None,
    }
    let name_start = match (chars.get(open + 2), chars.get(open + 3)) {
        (Some((_, 'P')), Some((_, '<'))) => open + 4,
        (Some((_, '<')), Some((_, c))) if *c != '=' && *c != '!' => open + 3,
        _ => return None,
    };
    let close = (name_start..chars.len()).find(|&idx| chars[idx].1 == '>')?;
    offset_at(close + 1).or_else(|| offset_at(close).map(|o| o + 1))
}

/// Returns the parameter spans of `text` described by the capture groups of `regex`.
///
/// Each span carries the group's body from the regex source as its
/// pattern. Groups that capture nothing produce no span. The result is
/// sorted by `(start, end)`.
///
/// # Errors
///
/// Returns `InvalidRegex` if the regex does not compile and
/// `NotMatchingRegex` if it does not match the whole text.
pub fn spans_from_regex(regex: &str, text: &str) -> Result<Vec<Span>> {
    let compiled = compile_anchored(regex)?;
    let captures = compiled
        .captures(text)
        .ok_or_else(|| Error::not_matching_regex(regex, text))?;
    let sources = capture_group_sources(regex);
    if sources.len() + 1 != captures.len() {
        return Err(Error::invalid_regex(
            regex,
            format!(
                "found {} capture groups in source, engine reports {}",
                sources.len(),
                captures.len() - 1
            ),
        ));
    }

    let mut spans: Vec<Span> = sources
        .iter()
        .zip(captures.iter().skip(1))
        .filter_map(|(source, m)| {
            let m = m?;
            (m.start() < m.end()).then(|| {
                Span::param(
                    m.start(),
                    m.end(),
                    &regex[source.body_start..source.close],
                )
            })
        })
        .collect();
    logcause_foundation::span::sort_spans(&mut spans);
    tracing::trace!(regex, spans = spans.len(), "spans from regex");
    Ok(spans)
}

/// Builds an anchored regex for `line_text` from parameter spans.
///
/// Spans contained in others are dropped, gaps are filled with the escaped
/// literal text, and every parameter span is wrapped in a capture group.
///
/// # Errors
///
/// Returns `InvalidSpan` for spans outside the line or not on character
/// boundaries, and `OverlappingSpans` for spans that cross each other.
pub fn regex_from_spans(spans: &[Span], line_text: &str) -> Result<String> {
    for span in spans {
        span.check_within(0, line_text.len())?;
        if !line_text.is_char_boundary(span.start) || !line_text.is_char_boundary(span.end) {
            return Err(Error::new(ErrorKind::InvalidSpan {
                start: span.start,
                end: span.end,
                total_start: 0,
                total_end: line_text.len(),
            }));
        }
    }

    let spans = remove_overlaps(spans.to_vec())?;
    let gaps = complement(&spans, 0, line_text.len(), |start, end| {
        create_obvious_regex(&line_text[start..end])
    })?;

    let mut all: Vec<Span> = spans.into_iter().chain(gaps).collect();
    all.sort_by_key(|s| s.start);

    let mut regex = String::from("^");
    for span in &all {
        if span.is_param {
            regex.push('(');
            regex.push_str(&span.pattern);
            regex.push(')');
        } else {
            regex.push_str(&span.pattern);
        }
    }
    regex.push('$');
    Ok(regex)
}

/// Escapes every regex metacharacter in `text`, giving a regex that matches
/// `text` literally and nothing else.
#[must_use]
pub fn create_obvious_regex(text: &str) -> String {
    regex::escape(text)
}

/// Builds a regex for a timestamp-like `text`.
///
/// Letter runs become `[a-zA-Z]+`, digit runs become `[0-9]{1,2}`,
/// `[0-9]{4}` or `[0-9]+` depending on their length, and everything else is
/// kept literally. For example `23/March/2016` gives
/// `[0-9]{1,2}/[a-zA-Z]+/[0-9]{4}`.
#[must_use]
pub fn create_date_regex(text: &str) -> String {
    let mut regex = String::new();
    for (class, start, end) in char_runs(text) {
        match class {
            RunClass::Alpha => regex.push_str("[a-zA-Z]+"),
            RunClass::Digit => {
                regex.push_str("[0-9]");
                regex.push_str(match end - start {
                    0..=2 => "{1,2}",
                    4 => "{4}",
                    _ => "+",
                });
            }
            RunClass::Other => regex.push_str(&create_obvious_regex(&text[start..end])),
        }
    }
    regex
}
