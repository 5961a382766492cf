//! Constraint cascade tests
//!
//! Tests that constraints and their links follow line and pattern edits.

use std::collections::BTreeSet;
use std::time::Duration;

use logcause_constraint::Constraint;
use logcause_foundation::{ConstraintId, ErrorKind, GroupRef, LineId};
use logcause_teacher::{SampleLine, Teacher};

use crate::{CAUSE, EFFECT, SECOND_CAUSE, date_of, three_line_teacher, two_line_teacher};

/// Every link points at a registered constraint and every registered
/// constraint is linked to exactly its own groups.
fn assert_consistent(teacher: &Teacher) {
    let registered: BTreeSet<ConstraintId> = teacher.constraints().keys().copied().collect();
    let linked: BTreeSet<ConstraintId> = teacher.links().triples().map(|t| t.2).collect();
    assert_eq!(linked, registered);
    for (id, constraint) in teacher.constraints() {
        let groups: BTreeSet<GroupRef> = constraint.groups().iter().copied().collect();
        let links: BTreeSet<GroupRef> = teacher.links().groups_of(*id).into_iter().collect();
        assert_eq!(links, groups);
        for group in &groups {
            assert!(
                teacher
                    .pattern_match(group.line_id)
                    .unwrap()
                    .param_groups
                    .contains_key(&group.group_no)
            );
        }
    }
}

fn with_constraints(teacher: &mut Teacher) -> [ConstraintId; 3] {
    let effect_cause = teacher
        .add_constraint(
            Constraint::time_delta(
                date_of(CAUSE),
                date_of(EFFECT),
                None,
                Some(Duration::from_secs(60)),
            )
            .unwrap(),
        )
        .unwrap();
    let causes = teacher
        .add_constraint(
            Constraint::time_delta(
                date_of(CAUSE),
                date_of(SECOND_CAUSE),
                None,
                Some(Duration::from_secs(60)),
            )
            .unwrap(),
        )
        .unwrap();
    let effect_second = teacher
        .add_constraint(
            Constraint::different_value(vec![date_of(EFFECT), date_of(SECOND_CAUSE)]).unwrap(),
        )
        .unwrap();
    assert_consistent(teacher);
    [effect_cause, causes, effect_second]
}

#[test]
fn fresh_ids_are_sequential() {
    let mut teacher = three_line_teacher();
    let ids = with_constraints(&mut teacher);
    assert_eq!(ids, [ConstraintId(0), ConstraintId(1), ConstraintId(2)]);
    assert_eq!(teacher.links().len(), 6);
}

#[test]
fn removing_a_line_removes_only_its_constraints() {
    let mut teacher = three_line_teacher();
    let [effect_cause, causes, effect_second] = with_constraints(&mut teacher);

    teacher.remove_line(CAUSE).unwrap();
    assert!(teacher.constraint(effect_cause).is_err());
    assert!(teacher.constraint(causes).is_err());
    assert!(teacher.constraint(effect_second).is_ok());
    assert!(!teacher.links().has_line(CAUSE));
    assert_consistent(&teacher);
}

#[test]
fn pattern_change_removes_constraints_even_for_same_regex() {
    let mut teacher = three_line_teacher();
    let [effect_cause, causes, effect_second] = with_constraints(&mut teacher);

    let regex = teacher.pattern_match(SECOND_CAUSE).unwrap().pattern.clone();
    teacher.update_pattern(SECOND_CAUSE, &regex).unwrap();
    assert_eq!(teacher.pattern_match(SECOND_CAUSE).unwrap().pattern, regex);
    assert!(teacher.constraint(effect_cause).is_ok());
    assert!(teacher.constraint(causes).is_err());
    assert!(teacher.constraint(effect_second).is_err());
    assert_consistent(&teacher);
}

#[test]
fn choosing_a_guess_removes_constraints() {
    let mut teacher = three_line_teacher();
    let [effect_cause, _, effect_second] = with_constraints(&mut teacher);

    teacher.choose_guessed_pattern(EFFECT, 0).unwrap();
    assert!(teacher.constraint(effect_cause).is_err());
    assert!(teacher.constraint(effect_second).is_err());
    assert_consistent(&teacher);
}

#[test]
fn failed_pattern_change_keeps_constraints() {
    let mut teacher = three_line_teacher();
    let ids = with_constraints(&mut teacher);

    assert!(teacher.update_pattern(CAUSE, "(").is_err());
    assert!(teacher.choose_guessed_pattern(CAUSE, 42).is_err());
    for id in ids {
        assert!(teacher.constraint(id).is_ok());
    }
    assert_consistent(&teacher);
}

#[test]
fn removing_by_group_and_by_id() {
    let mut teacher = three_line_teacher();
    let [effect_cause, causes, effect_second] = with_constraints(&mut teacher);

    let removed = teacher.remove_constraints_by_group(EFFECT, 1);
    assert_eq!(removed, vec![effect_cause, effect_second]);
    assert!(teacher.remove_constraints_by_group(EFFECT, 1).is_empty());

    teacher.remove_constraint(causes).unwrap();
    assert!(teacher.constraints().is_empty());
    assert!(teacher.links().is_empty());

    let err = teacher.remove_constraint(causes).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnknownConstraint(_)));
}

#[test]
fn replacing_a_line_removes_its_constraints() {
    let mut teacher = three_line_teacher();
    let [effect_cause, causes, effect_second] = with_constraints(&mut teacher);

    teacher.add_line(CAUSE, SampleLine::new("disk full"), false);
    assert!(teacher.constraint(effect_cause).is_err());
    assert!(teacher.constraint(causes).is_err());
    assert!(teacher.constraint(effect_second).is_ok());
    assert_consistent(&teacher);
}

#[test]
fn registration_checks_current_groups() {
    let mut teacher = two_line_teacher();
    let constraint = Constraint::identical(vec![date_of(EFFECT), date_of(CAUSE)]).unwrap();

    let err = teacher
        .register_constraint(ConstraintId(3), constraint.clone())
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnknownGroup { .. }));
    assert_eq!(err.context.unwrap().constraint, Some(ConstraintId(3)));

    let missing_line =
        Constraint::identical(vec![date_of(EFFECT), date_of(LineId(8))]).unwrap();
    teacher.choose_guessed_pattern(EFFECT, 1).unwrap();
    let err = teacher.add_constraint(missing_line).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnknownLine(LineId(8))));

    teacher.choose_guessed_pattern(CAUSE, 1).unwrap();
    teacher.register_constraint(ConstraintId(3), constraint).unwrap();
    let next = teacher
        .add_constraint(Constraint::different_value(vec![date_of(EFFECT), date_of(CAUSE)]).unwrap())
        .unwrap();
    assert_eq!(next, ConstraintId(4));
    assert_consistent(&teacher);
}

#[test]
fn reregistering_an_id_replaces_the_constraint() {
    let mut teacher = three_line_teacher();
    let [effect_cause, ..] = with_constraints(&mut teacher);

    let replacement =
        Constraint::identical(vec![date_of(SECOND_CAUSE), date_of(EFFECT)]).unwrap();
    teacher
        .register_constraint(effect_cause, replacement.clone())
        .unwrap();
    assert_eq!(teacher.constraint(effect_cause).unwrap(), &replacement);
    assert!(!teacher.links().contains(CAUSE, 1, effect_cause));
    assert!(teacher.links().contains(SECOND_CAUSE, 1, effect_cause));
    assert_consistent(&teacher);
}

#[test]
fn highest_id_registers_and_exhausts_fresh_ids() {
    let mut teacher = three_line_teacher();
    let first = teacher
        .add_constraint(Constraint::identical(vec![date_of(EFFECT), date_of(CAUSE)]).unwrap())
        .unwrap();
    assert_eq!(first, ConstraintId(0));

    let last = ConstraintId(u32::MAX);
    teacher
        .register_constraint(
            last,
            Constraint::identical(vec![date_of(CAUSE), date_of(SECOND_CAUSE)]).unwrap(),
        )
        .unwrap();
    assert!(teacher.constraint(last).is_ok());

    let err = teacher
        .add_constraint(Constraint::identical(vec![date_of(EFFECT), date_of(SECOND_CAUSE)]).unwrap())
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ConstraintIdsExhausted));
    assert_eq!(teacher.constraints().len(), 2);
    assert!(teacher.constraint(first).is_ok());
    assert_consistent(&teacher);

    // Explicit ids below the maximum stay usable.
    let replacement = Constraint::identical(vec![date_of(SECOND_CAUSE), date_of(EFFECT)]).unwrap();
    teacher.register_constraint(first, replacement.clone()).unwrap();
    assert_eq!(teacher.constraint(first).unwrap(), &replacement);
    assert_consistent(&teacher);
}
