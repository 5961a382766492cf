//! Constraint linkage graph.
//!
//! Records which constraints reference which `(line, group)` pairs so that
//! removing a line or editing its pattern can find every dependent
//! constraint. Two indices are kept in step:
//! - by group: `(line, group) -> constraints`
//! - by constraint: `constraint -> (line, group)s`
//!
//! Every removal is a no-op when the link is absent.

use std::collections::{BTreeMap, BTreeSet};

use logcause_foundation::{ConstraintId, GroupNo, GroupRef, LineId};

use crate::constraint::Constraint;

/// Bidirectional index between parameter groups and constraints.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConstraintLinks {
    by_group: BTreeMap<GroupRef, BTreeSet<ConstraintId>>,
    by_constraint: BTreeMap<ConstraintId, BTreeSet<GroupRef>>,
}

impl ConstraintLinks {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the graph for a set of registered constraints.
    pub fn from_constraints<'a>(
        constraints: impl IntoIterator<Item = (&'a ConstraintId, &'a Constraint)>,
    ) -> Self {
        let mut links = Self::new();
        for (id, constraint) in constraints {
            links.add_constraint(*id, constraint);
        }
        links
    }

    /// Inserts `(line, group, constraint)` triples. Existing triples are kept.
    pub fn add_links(&mut self, triples: impl IntoIterator<Item = (LineId, GroupNo, ConstraintId)>) {
        for (line_id, group_no, constraint_id) in triples {
            let group = GroupRef::new(line_id, group_no);
            self.by_group.entry(group).or_default().insert(constraint_id);
            self.by_constraint
                .entry(constraint_id)
                .or_default()
                .insert(group);
        }
    }

    /// Links every group of `constraint` to `id`.
    pub fn add_constraint(&mut self, id: ConstraintId, constraint: &Constraint) {
        self.add_links(
            constraint
                .groups()
                .iter()
                .map(|group| (group.line_id, group.group_no, id)),
        );
    }

    /// Removes every triple of `constraint_id`.
    pub fn remove_by_constraint(&mut self, constraint_id: ConstraintId) {
        let Some(groups) = self.by_constraint.remove(&constraint_id) else {
            return;
        };
        for group in groups {
            self.unlink_group(group, constraint_id);
        }
    }

    /// Removes every triple of `line_id` and returns the distinct constraints
    /// that lost at least one link.
    ///
    /// The returned constraints may still be linked to other lines; callers
    /// deregister them with [`remove_by_constraint`](Self::remove_by_constraint).
    pub fn remove_by_line(&mut self, line_id: LineId) -> Vec<ConstraintId> {
        let groups: Vec<GroupRef> = self.line_range(line_id).map(|(group, _)| *group).collect();
        self.remove_groups(groups)
    }

    /// Removes every triple of one group and returns the affected constraints.
    pub fn remove_by_group(&mut self, line_id: LineId, group_no: GroupNo) -> Vec<ConstraintId> {
        self.remove_groups([GroupRef::new(line_id, group_no)])
    }

    fn remove_groups(&mut self, groups: impl IntoIterator<Item = GroupRef>) -> Vec<ConstraintId> {
        let mut affected = BTreeSet::new();
        for group in groups {
            let Some(constraints) = self.by_group.remove(&group) else {
                continue;
            };
            for constraint_id in constraints {
                if let Some(linked) = self.by_constraint.get_mut(&constraint_id) {
                    linked.remove(&group);
                    if linked.is_empty() {
                        self.by_constraint.remove(&constraint_id);
                    }
                }
                affected.insert(constraint_id);
            }
        }
        affected.into_iter().collect()
    }

    fn unlink_group(&mut self, group: GroupRef, constraint_id: ConstraintId) {
        if let Some(constraints) = self.by_group.get_mut(&group) {
            constraints.remove(&constraint_id);
            if constraints.is_empty() {
                self.by_group.remove(&group);
            }
        }
    }

    fn line_range(
        &self,
        line_id: LineId,
    ) -> impl Iterator<Item = (&GroupRef, &BTreeSet<ConstraintId>)> {
        self.by_group
            .range(GroupRef::new(line_id, GroupNo::MIN)..=GroupRef::new(line_id, GroupNo::MAX))
    }

    /// Constraints referencing any group of `line_id`, without removing them.
    #[must_use]
    pub fn constraints_of_line(&self, line_id: LineId) -> Vec<ConstraintId> {
        let ids: BTreeSet<ConstraintId> = self
            .line_range(line_id)
            .flat_map(|(_, ids)| ids.iter().copied())
            .collect();
        ids.into_iter().collect()
    }

    /// Constraints referencing one group.
    #[must_use]
    pub fn constraints_of_group(&self, group: GroupRef) -> Vec<ConstraintId> {
        self.by_group
            .get(&group)
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Groups linked to a constraint.
    #[must_use]
    pub fn groups_of(&self, constraint_id: ConstraintId) -> Vec<GroupRef> {
        self.by_constraint
            .get(&constraint_id)
            .map(|groups| groups.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Returns true if the triple is present.
    #[must_use]
    pub fn contains(&self, line_id: LineId, group_no: GroupNo, constraint_id: ConstraintId) -> bool {
        self.by_group
            .get(&GroupRef::new(line_id, group_no))
            .is_some_and(|ids| ids.contains(&constraint_id))
    }

    /// Returns true if any triple references `line_id`.
    #[must_use]
    pub fn has_line(&self, line_id: LineId) -> bool {
        self.line_range(line_id).next().is_some()
    }

    /// Returns true if any triple references `constraint_id`.
    #[must_use]
    pub fn has_constraint(&self, constraint_id: ConstraintId) -> bool {
        self.by_constraint.contains_key(&constraint_id)
    }

    /// All triples, ordered by line, group, then constraint.
    pub fn triples(&self) -> impl Iterator<Item = (LineId, GroupNo, ConstraintId)> + '_ {
        self.by_group.iter().flat_map(|(group, ids)| {
            ids.iter()
                .map(move |id| (group.line_id, group.group_no, *id))
        })
    }

    /// Number of triples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_group.values().map(BTreeSet::len).sum()
    }

    /// Returns true if there are no triples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_group.is_empty()
    }
}
