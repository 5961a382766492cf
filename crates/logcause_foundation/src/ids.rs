//! Identifiers for lines, parameter groups, and constraints.
//!
//! Lines and constraints are keyed by caller-chosen integers. Group numbers
//! are regex capture ordinals and start at 1.

use std::fmt;

/// Regex capture group ordinal (1-based).
pub type GroupNo = usize;

/// Identifier of a sample line inside one rule-editing session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineId(pub u32);

impl LineId {
    /// Creates a new line id.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line#{}", self.0)
    }
}

/// Identifier of a registered constraint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConstraintId(pub u32);

impl ConstraintId {
    /// Creates a new constraint id.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the id following this one, or `None` past `u32::MAX`.
    #[must_use]
    pub const fn checked_next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(id) => Some(Self(id)),
            None => None,
        }
    }
}

impl fmt::Display for ConstraintId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "constraint#{}", self.0)
    }
}

/// A parameter group of a specific line: the `(line, group)` pair that
/// constraints refer to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroupRef {
    /// The line owning the group.
    pub line_id: LineId,
    /// The group ordinal inside that line's pattern.
    pub group_no: GroupNo,
}

impl GroupRef {
    /// Creates a new group reference.
    #[must_use]
    pub const fn new(line_id: LineId, group_no: GroupNo) -> Self {
        Self { line_id, group_no }
    }
}

impl From<(LineId, GroupNo)> for GroupRef {
    fn from((line_id, group_no): (LineId, GroupNo)) -> Self {
        Self { line_id, group_no }
    }
}

impl fmt::Display for GroupRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/group#{}", self.line_id, self.group_no)
    }
}
