//! Integration tests for errors and validation results
//!
//! Tests error messages, context, and severity handling.

use logcause_foundation::{
    ConstraintId, Error, ErrorContext, ErrorKind, LineId, Severity, ValidationResult,
};

#[test]
fn unknown_line_message() {
    let err = Error::unknown_line(LineId(7));
    assert_eq!(err.to_string(), "unknown line: line#7");
}

#[test]
fn context_is_attached() {
    let err = Error::unknown_constraint(ConstraintId(3)).with_context(
        ErrorContext::new()
            .with_operation("remove_constraint")
            .with_constraint(ConstraintId(3)),
    );
    let context = err.context.unwrap();
    assert_eq!(context.to_string(), "in remove_constraint for constraint#3");
}

#[test]
fn groups_count_error_message() {
    let err = Error::new(ErrorKind::ConstructorGroupsCount {
        constraint: "identical".to_string(),
        min: Some(2),
        max: None,
        actual: 1,
    });
    assert_eq!(
        err.to_string(),
        "identical constraint takes at least 2 groups, got 1"
    );
}

#[test]
fn validation_results_merge() {
    let mut pattern = ValidationResult::new();
    pattern.push(Severity::Warning, "stale pattern");
    let mut converters = ValidationResult::new();
    converters.push(Severity::Error, "bad converter");

    let merged = ValidationResult::from_results([pattern, converters]);
    assert!(!merged.is_acceptable());
    assert_eq!(merged.errors, vec!["bad converter"]);
    assert_eq!(merged.warnings, vec!["stale pattern"]);
}
