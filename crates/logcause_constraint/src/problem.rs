//! Problems reported when validating a constraint.

use std::fmt;
use std::time::Duration;

use logcause_foundation::Severity;

/// A problem found while validating or verifying a constraint.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConstraintProblem {
    /// A time delta whose lower bound exceeds its upper bound.
    WrongTimeDeltas {
        /// The lower bound.
        min: Duration,
        /// The upper bound.
        max: Duration,
    },
    /// The sample contents do not satisfy the constraint.
    VerificationFailed {
        /// Group contents in constraint order.
        contents: Vec<String>,
    },
    /// The sample contents cannot be checked at all, e.g. a date group
    /// that does not parse.
    Unverifiable {
        /// Why verification could not run.
        reason: String,
    },
}

impl ConstraintProblem {
    /// Returns the severity of this problem.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        match self {
            Self::WrongTimeDeltas { .. } | Self::VerificationFailed { .. } => Severity::Error,
            Self::Unverifiable { .. } => Severity::Warning,
        }
    }
}

impl fmt::Display for ConstraintProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WrongTimeDeltas { min, max } => write!(
                f,
                "min time delta {min:?} should not exceed max time delta {max:?}"
            ),
            Self::VerificationFailed { contents } => {
                write!(f, "constraint verification failed for groups {contents:?}")
            }
            Self::Unverifiable { reason } => write!(f, "constraint cannot be verified: {reason}"),
        }
    }
}
