//! The exported form of a rule.
//!
//! [`Teacher::get_rule`](crate::Teacher::get_rule) projects the session
//! state into these plain serializable types. They hold copies, so later
//! edits to the session do not affect an exported rule.

use std::collections::BTreeMap;

use logcause_constraint::{Constraint, ConstraintKind, Params};
use logcause_foundation::{GroupNo, GroupRef, LineId, Result};
use logcause_pattern::ParamGroup;
use serde::{Deserialize, Serialize};

use crate::line::LineSource;

/// One line's parser as it will be saved.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserIntent {
    /// Parser name, unique within the configuration.
    pub name: String,
    /// Anchored regex.
    pub pattern: String,
    /// Log type the parser applies to.
    pub log_type: Option<String>,
    /// Group numbers correlating occurrences across sources.
    pub primary_key: Vec<GroupNo>,
    /// Captured groups with their converters.
    pub groups: BTreeMap<GroupNo, ParamGroup>,
    /// The sample line the parser was taught on.
    pub line_content: String,
    /// Offset of the sample line in its file.
    pub line_offset: u64,
    /// Where the sample line came from.
    pub line_source: LineSource,
}

/// One constraint as it will be saved.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConstraintIntent {
    /// Constraint type.
    pub kind: ConstraintKind,
    /// Constrained groups, in constraint order.
    pub groups: Vec<GroupRef>,
    /// Parameters by name.
    pub params: Params,
}

impl ConstraintIntent {
    /// Rebuilds the constraint, re-checking arity and parameter names.
    ///
    /// # Errors
    ///
    /// Returns `ConstructorGroupsCount` or `ConstructorParams`.
    pub fn to_constraint(&self) -> Result<Constraint> {
        Constraint::new(self.kind, self.groups.clone(), self.params.clone())
    }
}

impl From<&Constraint> for ConstraintIntent {
    fn from(constraint: &Constraint) -> Self {
        Self {
            kind: constraint.kind(),
            groups: constraint.groups().to_vec(),
            params: constraint.params().clone(),
        }
    }
}

/// A complete rule: effect line, cause lines, and constraints.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleIntent {
    /// The effect line, if one was marked.
    pub effect_id: Option<LineId>,
    /// Parsers by line.
    pub parsers: BTreeMap<LineId, ParserIntent>,
    /// Constraints, ordered by constraint id.
    pub constraints: Vec<ConstraintIntent>,
}

impl RuleIntent {
    /// The effect line's parser.
    #[must_use]
    pub fn effect_parser(&self) -> Option<&ParserIntent> {
        self.effect_id.and_then(|id| self.parsers.get(&id))
    }

    /// Parsers of every line except the effect.
    pub fn cause_parsers(&self) -> impl Iterator<Item = (&LineId, &ParserIntent)> {
        self.parsers
            .iter()
            .filter(|(id, _)| Some(**id) != self.effect_id)
    }

    /// Names of all parsers, in line order.
    #[must_use]
    pub fn parser_names(&self) -> Vec<&str> {
        self.parsers.values().map(|p| p.name.as_str()).collect()
    }
}
