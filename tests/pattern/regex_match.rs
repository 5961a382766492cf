//! Integration tests for the per-line pattern container
//!
//! Tests guess selection, regex edits, converters, primary keys and validation.

use logcause_foundation::{Converter, ErrorKind, LineId};
use logcause_pattern::{GuessConfig, PatternProblem, RegexMatch};

const LINE: &str = "2015-12-03 12:11:00 Error occurred in reading test";

fn container() -> RegexMatch {
    RegexMatch::new(LineId(1), LINE, &GuessConfig::default())
}

#[test]
fn date_guess_with_date_converter_validates() {
    let mut rm = container();
    rm.update_by_guessed_regex(1).unwrap();
    rm.set_converter(1, Converter::Date).unwrap();

    assert_eq!(rm.param_groups()[&1].content, "2015-12-03 12:11:00");
    assert_eq!(rm.primary_key(), &[1]);
    let result = rm.validate();
    assert!(result.errors.is_empty());
    assert!(result.warnings.is_empty());
}

#[test]
fn float_converter_on_date_is_reported() {
    let mut rm = container();
    rm.update_by_guessed_regex(1).unwrap();
    rm.set_converter(1, Converter::Float).unwrap();

    let result = rm.validate();
    assert!(result.contains(&PatternProblem::WrongConverter {
        line_id: LineId(1),
        group_no: 1,
        content: "2015-12-03 12:11:00".to_string(),
        converter: Converter::Float,
    }));
    assert!(!result.is_acceptable());
}

#[test]
fn regex_edit_resets_groups_and_primary_key() {
    let mut rm = container();
    rm.update_by_guessed_regex(1).unwrap();
    rm.set_converter(1, Converter::Date).unwrap();

    rm.update_by_regex(r"^(\S+) (\S+) (\w+) occurred in (\w+) test$")
        .unwrap();
    assert_eq!(rm.pattern_match().group_numbers(), vec![1, 2, 3, 4]);
    assert!(rm
        .param_groups()
        .values()
        .all(|g| g.converter == Converter::String));
    assert_eq!(rm.param_groups()[&4].content, "reading");
    assert_eq!(rm.primary_key(), &[1]);
}

#[test]
fn primary_key_outside_groups_is_an_error() {
    let mut rm = container();
    rm.update_by_guessed_regex(1).unwrap();
    rm.set_primary_key(vec![1, 5]);

    let result = rm.validate();
    assert!(result.contains(&PatternProblem::InvalidPrimaryKey {
        line_id: LineId(1),
        primary_key: vec![1, 5],
        groups: vec![1],
    }));
}

#[test]
fn non_matching_regex_is_kept_as_warning() {
    let mut rm = container();
    rm.update_by_regex("^Warning (.*)$").unwrap();

    assert_eq!(rm.regex(), "^Warning (.*)$");
    assert!(rm.param_groups().is_empty());
    let result = rm.validate();
    assert!(result.errors.is_empty());
    assert!(result.contains(&PatternProblem::NotMatchingPattern { line_id: LineId(1) }));
}

#[test]
fn invalid_regex_leaves_container_unchanged() {
    let mut rm = container();
    rm.update_by_guessed_regex(1).unwrap();
    let before = rm.pattern_match().clone();

    let err = rm.update_by_regex("(unclosed").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidRegex { .. }));
    assert_eq!(rm.pattern_match(), &before);
}

#[test]
fn unknown_guess_and_group_are_errors() {
    let mut rm = container();
    let err = rm.update_by_guessed_regex(99).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnknownGuess(99)));

    let err = rm.set_converter(1, Converter::Int).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnknownGroup { .. }));
}

#[test]
fn guesses_survive_regex_edits() {
    let mut rm = container();
    let guesses = rm.guessed_pattern_matches().clone();
    rm.update_by_regex(".*").unwrap();
    assert_eq!(rm.guessed_pattern_matches(), &guesses);
    rm.update_by_guessed_regex(0).unwrap();
    assert_eq!(rm.pattern_match(), &guesses[&0]);
}
