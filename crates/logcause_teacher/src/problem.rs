//! Problems reported when validating a whole rule.

use std::collections::BTreeMap;
use std::fmt;

use logcause_constraint::ConstraintProblem;
use logcause_foundation::{ConstraintId, LineId, ValidationResult};
use logcause_pattern::PatternProblem;

/// A problem with the rule as a whole.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RuleProblem {
    /// No line is marked as the effect.
    NoEffectParser,
    /// The rule has too few lines.
    ParserCount {
        /// Lines in the rule.
        count: usize,
        /// Lines required.
        min: usize,
    },
}

impl fmt::Display for RuleProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoEffectParser => f.write_str("rule has no effect line"),
            Self::ParserCount { count, min } => {
                write!(f, "rule has {count} line(s), at least {min} required")
            }
        }
    }
}

/// A problem with one line's parser.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ParserProblem {
    /// A problem with the pattern itself.
    Pattern(PatternProblem),
    /// Another parser in the rule has the same name.
    NotUniqueName {
        /// The shared name.
        name: String,
    },
    /// No log type was chosen for the parser.
    NotSetLogType,
}

impl From<PatternProblem> for ParserProblem {
    fn from(problem: PatternProblem) -> Self {
        Self::Pattern(problem)
    }
}

impl fmt::Display for ParserProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pattern(problem) => problem.fmt(f),
            Self::NotUniqueName { name } => write!(f, "parser name is not unique: {name}"),
            Self::NotSetLogType => f.write_str("log type is not set"),
        }
    }
}

/// Everything [`Teacher::validate`](crate::Teacher::validate) found.
///
/// Lines and constraints without problems have no entry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RuleValidationResult {
    /// Rule-level problems.
    pub rule_problems: ValidationResult<RuleProblem>,
    /// Problems by line.
    pub parser_problems: BTreeMap<LineId, ValidationResult<ParserProblem>>,
    /// Problems by constraint.
    pub constraint_problems: BTreeMap<ConstraintId, ValidationResult<ConstraintProblem>>,
}

impl RuleValidationResult {
    /// Returns true if there are no errors anywhere; warnings are allowed.
    #[must_use]
    pub fn is_acceptable(&self) -> bool {
        self.error_count() == 0
    }

    /// Number of errors across the rule, its parsers, and its constraints.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.rule_problems.errors.len()
            + self
                .parser_problems
                .values()
                .map(|r| r.errors.len())
                .sum::<usize>()
            + self
                .constraint_problems
                .values()
                .map(|r| r.errors.len())
                .sum::<usize>()
    }

    /// Number of warnings across the rule, its parsers, and its constraints.
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.rule_problems.warnings.len()
            + self
                .parser_problems
                .values()
                .map(|r| r.warnings.len())
                .sum::<usize>()
            + self
                .constraint_problems
                .values()
                .map(|r| r.warnings.len())
                .sum::<usize>()
    }

    /// Returns true if `problem` was reported for the rule.
    #[must_use]
    pub fn has_rule_problem(&self, problem: &RuleProblem) -> bool {
        self.rule_problems.contains(problem)
    }

    /// Returns true if `problem` was reported for `line_id`.
    #[must_use]
    pub fn has_parser_problem(&self, line_id: LineId, problem: &ParserProblem) -> bool {
        self.parser_problems
            .get(&line_id)
            .is_some_and(|r| r.contains(problem))
    }

    /// Returns true if `problem` was reported for `constraint_id`.
    #[must_use]
    pub fn has_constraint_problem(
        &self,
        constraint_id: ConstraintId,
        problem: &ConstraintProblem,
    ) -> bool {
        self.constraint_problems
            .get(&constraint_id)
            .is_some_and(|r| r.contains(problem))
    }
}
