//! Integration tests for regex/span translation
//!
//! Tests span recovery from regexes and regex reconstruction from spans.

use logcause_foundation::{ErrorKind, Span};
use logcause_pattern::{
    create_obvious_regex, regex_from_spans, regex_groups, spans_from_regex, verify_regex,
};
use proptest::prelude::*;

const LINE: &str = "2015-12-03 12:11:00 Error occurred in reading test";

// =============================================================================
// Spans From Regex
// =============================================================================

#[test]
fn spans_carry_group_patterns() {
    let regex = r"^(\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}) Error occurred in (\w+) test$";
    let spans = spans_from_regex(regex, LINE).unwrap();
    assert_eq!(spans.len(), 2);
    assert_eq!(spans[0].text(LINE), "2015-12-03 12:11:00");
    assert_eq!(spans[0].pattern, r"\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}");
    assert_eq!(spans[1].text(LINE), "reading");
    assert!(spans.iter().all(|s| s.is_param));
}

#[test]
fn named_and_non_capturing_groups() {
    let regex = r"^(?P<date>[0-9-]+) (?:[0-9:]+) (?<level>\w+) .*$";
    let spans = spans_from_regex(regex, LINE).unwrap();
    let texts: Vec<&str> = spans.iter().map(|s| s.text(LINE)).collect();
    assert_eq!(texts, vec!["2015-12-03", "Error"]);
    assert_eq!(spans[1].pattern, r"\w+");
}

#[test]
fn escaped_parens_and_classes_are_not_groups() {
    let text = "(a) [b)] c";
    let regex = r"^\(a\) [\[](b)[)\]]\] (c)$";
    let spans = spans_from_regex(regex, text).unwrap();
    let texts: Vec<&str> = spans.iter().map(|s| s.text(text)).collect();
    assert_eq!(texts, vec!["b", "c"]);
}

#[test]
fn non_participating_group_has_no_span() {
    let regex = r"^(\d+)?(Error) occurred$";
    let spans = spans_from_regex(regex, "Error occurred").unwrap();
    assert_eq!(spans.len(), 1);
    assert_eq!(regex_groups(regex, "Error occurred").unwrap(), vec!["", "Error"]);
}

#[test]
fn unanchored_regex_must_still_match_everything() {
    assert!(verify_regex("Error occurred", LINE).is_err());
    assert!(verify_regex(".*Error occurred.*", LINE).is_ok());
}

#[test]
fn invalid_regex_is_reported() {
    let err = spans_from_regex("(unclosed", LINE).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidRegex { .. }));
}

// =============================================================================
// Regex From Spans
// =============================================================================

#[test]
fn spans_become_groups() {
    let spans = vec![Span::param(0, 19, r"[0-9: -]+"), Span::param(20, 25, r"\w+")];
    let regex = regex_from_spans(&spans, LINE).unwrap();
    assert_eq!(
        regex,
        format!(
            "^([0-9: -]+) (\\w+){}$",
            create_obvious_regex(" occurred in reading test")
        )
    );
    assert_eq!(
        verify_regex(&regex, LINE).unwrap(),
        vec!["2015-12-03 12:11:00", "Error"]
    );
}

#[test]
fn no_spans_gives_literal_regex() {
    let regex = regex_from_spans(&[], "a.b*c").unwrap();
    assert_eq!(regex, r"^a\.b\*c$");
}

#[test]
fn contained_span_is_absorbed() {
    let spans = vec![Span::param(0, 19, ".+"), Span::param(0, 10, ".+")];
    let regex = regex_from_spans(&spans, LINE).unwrap();
    assert_eq!(verify_regex(&regex, LINE).unwrap().len(), 1);
}

#[test]
fn partial_overlap_is_rejected() {
    let spans = vec![Span::param(0, 12, ".+"), Span::param(8, 19, ".+")];
    let err = regex_from_spans(&spans, LINE).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::OverlappingSpans { .. }));
}

#[test]
fn span_inside_multibyte_char_is_rejected() {
    let text = "zażółć 12";
    let err = regex_from_spans(&[Span::param(3, 5, ".+")], text).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidSpan { .. }));
}

// =============================================================================
// Round Trip
// =============================================================================

/// One word-like piece of a generated line, together with how the regex
/// describes it.
#[derive(Clone, Debug)]
enum Piece {
    Digits(String),
    Word(String),
    Named(String),
    AngleNamed(String),
    Upper(String),
    Level(&'static str),
    NonCapturing(String),
    Literal(String),
}

impl Piece {
    fn text(&self) -> &str {
        match self {
            Self::Digits(s)
            | Self::Word(s)
            | Self::Named(s)
            | Self::AngleNamed(s)
            | Self::Upper(s)
            | Self::NonCapturing(s)
            | Self::Literal(s) => s,
            Self::Level(s) => s,
        }
    }

    fn regex(&self, index: usize) -> String {
        match self {
            Self::Digits(_) => "([0-9]+)".to_string(),
            Self::Word(_) => r"(\w+)".to_string(),
            Self::Named(_) => format!("(?P<p{index}>[a-z]+)"),
            Self::AngleNamed(_) => format!("(?<q{index}>[a-z0-9]+)"),
            Self::Upper(_) => "([A-Z]{1,4})".to_string(),
            Self::Level(_) => "(ERROR|WARN|INFO)".to_string(),
            Self::NonCapturing(_) => "(?:[a-z]+)".to_string(),
            Self::Literal(s) => create_obvious_regex(s),
        }
    }
}

fn piece() -> impl Strategy<Value = Piece> {
    prop_oneof![
        "[0-9]{1,4}".prop_map(Piece::Digits),
        "[a-z0-9_]{1,5}".prop_map(Piece::Word),
        "[a-z]{1,5}".prop_map(Piece::Named),
        "[a-z0-9]{1,5}".prop_map(Piece::AngleNamed),
        "[A-Z]{1,4}".prop_map(Piece::Upper),
        prop::sample::select(vec!["ERROR", "WARN", "INFO"]).prop_map(Piece::Level),
        "[a-z]{1,5}".prop_map(Piece::NonCapturing),
        "[a-z]{1,5}".prop_map(Piece::Literal),
    ]
}

/// Pieces separated by non-word delimiters, so every group has exactly one
/// way to match.
fn segments() -> impl Strategy<Value = (Vec<(String, Piece)>, String)> {
    (
        prop::collection::vec(("[ .*+?():=|-]{1,4}", piece()), 0..6),
        "[ .]{0,3}",
    )
}

proptest! {
    #[test]
    fn span_round_trip((pairs, tail) in segments()) {
        let mut text = String::new();
        let mut regex = String::from("^");
        for (index, (delimiter, piece)) in pairs.iter().enumerate() {
            text.push_str(delimiter);
            text.push_str(piece.text());
            regex.push_str(&create_obvious_regex(delimiter));
            regex.push_str(&piece.regex(index));
        }
        text.push_str(&tail);
        regex.push_str(&create_obvious_regex(&tail));
        regex.push('$');

        let original = verify_regex(&regex, &text).unwrap();
        let spans = spans_from_regex(&regex, &text).unwrap();
        let rebuilt = regex_from_spans(&spans, &text).unwrap();
        prop_assert_eq!(verify_regex(&rebuilt, &text).unwrap(), original);
    }
}

#[test]
fn empty_captures_are_dropped_by_round_trip() {
    let regex = r"^(a+)b(c*)$";
    assert_eq!(verify_regex(regex, "aab").unwrap(), vec!["aa", ""]);

    let spans = spans_from_regex(regex, "aab").unwrap();
    assert_eq!(spans, vec![Span::param(0, 2, "a+")]);
    let rebuilt = regex_from_spans(&spans, "aab").unwrap();
    assert_eq!(verify_regex(&rebuilt, "aab").unwrap(), vec!["aa"]);
}
