//! Line management tests
//!
//! Tests adding, replacing and removing lines, and per-line pattern edits.

use logcause_foundation::{Converter, ErrorKind, LineId};
use logcause_teacher::{LineSource, MemoryConfigStore, SampleLine, Teacher};
use regex::Regex;

use crate::{CAUSE, CAUSE_LINE, EFFECT, EFFECT_LINE, two_line_teacher};

#[test]
fn lines_start_on_literal_guess_with_names() {
    let teacher = two_line_teacher();
    assert_eq!(teacher.line_ids().collect::<Vec<_>>(), vec![EFFECT, CAUSE]);
    assert_eq!(teacher.effect_id(), Some(EFFECT));

    let cause = teacher.parser(CAUSE).unwrap();
    assert_eq!(cause.name(), "data_missing_comp");
    assert_eq!(cause.log_type(), None);
    assert!(cause.regex_match().param_groups().is_empty());
    assert_eq!(
        teacher.guess_patterns(CAUSE).unwrap()[0],
        cause.regex_match().regex()
    );
}

#[test]
fn guesses_are_offered_for_every_line() {
    let teacher = two_line_teacher();
    let guesses = teacher.guessed_pattern_matches(CAUSE).unwrap();
    let date_guess = &guesses[&1];
    assert_eq!(date_guess.param_groups[&1].content, "2015-12-03 12:10:10");
    assert_eq!(
        teacher.guess_patterns(CAUSE).unwrap().len(),
        guesses.len()
    );
}

#[test]
fn sample_line_position_is_kept() {
    let mut teacher = two_line_teacher();
    let line = SampleLine::new(CAUSE_LINE)
        .with_offset(4096)
        .with_source(LineSource::new("db01", "/var/log/db.log"));
    teacher.add_line(LineId(7), line.clone(), false);
    assert_eq!(teacher.parser(LineId(7)).unwrap().line(), &line);
}

#[test]
fn duplicate_lines_get_distinct_names() {
    let mut teacher = two_line_teacher();
    teacher.add_line(LineId(2), SampleLine::new(CAUSE_LINE), false);
    teacher.add_line(LineId(3), SampleLine::new(CAUSE_LINE), false);
    let names: Vec<String> = [CAUSE, LineId(2), LineId(3)]
        .into_iter()
        .map(|id| teacher.parser(id).unwrap().name().to_string())
        .collect();
    assert_eq!(
        names,
        vec!["data_missing_comp", "data_missing_comp_2", "data_missing_comp_3"]
    );
}

#[test]
fn adding_a_line_can_move_the_effect() {
    let mut teacher = two_line_teacher();
    teacher.add_line(LineId(5), SampleLine::new("disk full"), true);
    assert_eq!(teacher.effect_id(), Some(LineId(5)));
}

#[test]
fn replacing_a_line_resets_its_parser() {
    let mut teacher = two_line_teacher();
    teacher.choose_guessed_pattern(CAUSE, 1).unwrap();
    teacher.set_log_type(CAUSE, "database").unwrap();

    teacher.add_line(CAUSE, SampleLine::new("disk full"), false);
    let parser = teacher.parser(CAUSE).unwrap();
    assert_eq!(parser.regex_match().regex(), "^disk full$");
    assert_eq!(parser.log_type(), None);
    assert_eq!(parser.name(), "disk_full");
}

#[test]
fn parser_settings_are_applied() {
    let mut teacher = two_line_teacher();
    teacher.choose_guessed_pattern(EFFECT, 1).unwrap();
    teacher.set_pattern_name(EFFECT, "read_error").unwrap();
    teacher.set_log_type(EFFECT, "app").unwrap();
    teacher.set_converter(EFFECT, 1, Converter::Date).unwrap();
    teacher.set_primary_key(EFFECT, vec![1]).unwrap();

    let parser = teacher.parser(EFFECT).unwrap();
    assert_eq!(parser.name(), "read_error");
    assert_eq!(parser.log_type(), Some("app"));
    assert_eq!(
        parser.regex_match().param_groups()[&1].converter,
        Converter::Date
    );
    assert_eq!(parser.regex_match().primary_key(), &[1]);
}

#[test]
fn update_pattern_anchors_and_regroups() {
    let mut teacher = two_line_teacher();
    teacher
        .update_pattern(EFFECT, r"(\S+ \S+) (\w+) occurred in (\w+) test")
        .unwrap();
    let pattern = teacher.pattern_match(EFFECT).unwrap();
    assert_eq!(pattern.pattern, r"^(\S+ \S+) (\w+) occurred in (\w+) test$");
    assert_eq!(pattern.group_numbers(), vec![1, 2, 3]);
    assert_eq!(pattern.param_groups[&3].content, "reading");
    assert_eq!(pattern.primary_key, vec![1]);
}

#[test]
fn exported_alternation_stays_whole_line() {
    let mut teacher = Teacher::new(MemoryConfigStore::new());
    teacher.add_line(EFFECT, SampleLine::new("disk full"), true);
    teacher
        .update_pattern(EFFECT, r"disk full|disk (\w+)")
        .unwrap();

    let rule = teacher.get_rule();
    let pattern = &rule.parsers[&EFFECT].pattern;
    assert_eq!(pattern, r"^(?:disk full|disk (\w+))$");

    let exported = Regex::new(pattern).unwrap();
    assert!(exported.is_match("disk full"));
    assert!(exported.is_match("disk xyz"));
    assert!(!exported.is_match("disk full AND MORE GARBAGE"));
    assert!(!exported.is_match("GARBAGE disk xyz"));
}

#[test]
fn edits_on_unknown_lines_fail_with_context() {
    let mut teacher = two_line_teacher();
    let err = teacher.update_pattern(LineId(9), "^.*$").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnknownLine(LineId(9))));
    let context = err.context.unwrap();
    assert_eq!(context.operation.as_deref(), Some("update_pattern"));

    assert!(teacher.set_log_type(LineId(9), "app").is_err());
    assert!(teacher.set_pattern_name(LineId(9), "x").is_err());
    assert!(teacher.set_primary_key(LineId(9), vec![1]).is_err());
    assert!(teacher.guess_patterns(LineId(9)).is_err());
}

#[test]
fn converter_on_missing_group_fails() {
    let mut teacher = two_line_teacher();
    let err = teacher.set_converter(EFFECT, 1, Converter::Int).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnknownGroup { .. }));
    assert_eq!(err.context.unwrap().line, Some(EFFECT));
}

#[test]
fn invalid_regex_leaves_line_untouched() {
    let mut teacher = two_line_teacher();
    let before = teacher.pattern_match(EFFECT).unwrap().clone();
    let err = teacher.update_pattern(EFFECT, "([0-9]").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidRegex { .. }));
    assert_eq!(teacher.pattern_match(EFFECT).unwrap(), &before);
    assert_eq!(before.line_text, EFFECT_LINE);
}
