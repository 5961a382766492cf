//! Problems reported when validating a line's pattern.

use std::fmt;

use logcause_foundation::{Converter, GroupNo, LineId, Severity};

/// A problem found by [`RegexMatch::validate`](crate::RegexMatch::validate).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PatternProblem {
    /// The regex no longer matches the line. Expected while the user types.
    NotMatchingPattern {
        /// The line whose pattern is stale.
        line_id: LineId,
    },
    /// A group's content does not convert under its converter.
    WrongConverter {
        /// The line owning the group.
        line_id: LineId,
        /// The group.
        group_no: GroupNo,
        /// The captured content.
        content: String,
        /// The converter that rejected it.
        converter: Converter,
    },
    /// The primary key names groups the pattern does not have.
    InvalidPrimaryKey {
        /// The line.
        line_id: LineId,
        /// The primary key as set.
        primary_key: Vec<GroupNo>,
        /// The group numbers the pattern actually has.
        groups: Vec<GroupNo>,
    },
}

impl PatternProblem {
    /// Returns the severity of this problem.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        match self {
            Self::NotMatchingPattern { .. } => Severity::Warning,
            Self::WrongConverter { .. } | Self::InvalidPrimaryKey { .. } => Severity::Error,
        }
    }

    /// Returns the line this problem belongs to.
    #[must_use]
    pub const fn line_id(&self) -> LineId {
        match self {
            Self::NotMatchingPattern { line_id }
            | Self::WrongConverter { line_id, .. }
            | Self::InvalidPrimaryKey { line_id, .. } => *line_id,
        }
    }
}

impl fmt::Display for PatternProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotMatchingPattern { line_id } => {
                write!(f, "pattern does not match line, {line_id}")
            }
            Self::WrongConverter {
                line_id,
                group_no,
                content,
                converter,
            } => write!(
                f,
                "wrong group converter {converter} for {content:?}, group {group_no}, {line_id}"
            ),
            Self::InvalidPrimaryKey {
                line_id,
                primary_key,
                groups,
            } => write!(
                f,
                "invalid primary key {primary_key:?}, available groups {groups:?}, {line_id}"
            ),
        }
    }
}
