//! Error types for the logcause system.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.
//!
//! Only contract violations become an [`Error`]: malformed constraints,
//! unknown ids, regexes that do not compile. States a user passes through
//! while editing (a pattern that stops matching, a bad converter) are
//! reported by `validate` instead.

use std::fmt;

use thiserror::Error;

use crate::ids::{ConstraintId, GroupNo, LineId};

/// Result type alias for logcause operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for logcause operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates a regex-does-not-match-text error.
    #[must_use]
    pub fn not_matching_regex(regex: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotMatchingRegex {
            regex: regex.into(),
            text: text.into(),
        })
    }

    /// Creates an invalid (non-compiling) regex error.
    #[must_use]
    pub fn invalid_regex(regex: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidRegex {
            regex: regex.into(),
            message: message.into(),
        })
    }

    /// Creates an unknown line error.
    #[must_use]
    pub fn unknown_line(id: LineId) -> Self {
        Self::new(ErrorKind::UnknownLine(id))
    }

    /// Creates an unknown group error.
    #[must_use]
    pub fn unknown_group(line: LineId, group: GroupNo) -> Self {
        Self::new(ErrorKind::UnknownGroup { line, group })
    }

    /// Creates an unknown constraint error.
    #[must_use]
    pub fn unknown_constraint(id: ConstraintId) -> Self {
        Self::new(ErrorKind::UnknownConstraint(id))
    }

    /// Creates a failed conversion error.
    #[must_use]
    pub fn conversion(converter: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conversion {
            converter: converter.into(),
            content: content.into(),
        })
    }

    /// Creates a constraint verification error.
    #[must_use]
    pub fn constraint_verification(
        constraint: impl Into<String>,
        contents: Vec<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::new(ErrorKind::ConstraintVerification {
            constraint: constraint.into(),
            contents,
            reason: reason.into(),
        })
    }
}

/// Error kinds shared by every layer of the workspace.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// The anchored regex does not match the whole text.
    #[error("regex {regex:?} does not match text {text:?}")]
    NotMatchingRegex {
        /// The regex that was tried.
        regex: String,
        /// The text it should have matched.
        text: String,
    },

    /// The regex failed to compile.
    #[error("invalid regex {regex:?}: {message}")]
    InvalidRegex {
        /// The regex source.
        regex: String,
        /// Message from the regex compiler.
        message: String,
    },

    /// A span lies outside the interval it should partition.
    #[error("span [{start}, {end}) outside of [{total_start}, {total_end})")]
    InvalidSpan {
        /// Span start offset.
        start: usize,
        /// Span end offset (exclusive).
        end: usize,
        /// Start of the covering interval.
        total_start: usize,
        /// End of the covering interval (exclusive).
        total_end: usize,
    },

    /// Two spans cross each other without one containing the other.
    #[error(
        "spans [{}, {}) and [{}, {}) partially overlap",
        .first.0, .first.1, .second.0, .second.1
    )]
    OverlappingSpans {
        /// The earlier span as `(start, end)`.
        first: (usize, usize),
        /// The later span as `(start, end)`.
        second: (usize, usize),
    },

    /// A constraint was built with a number of groups outside its arity.
    #[error(
        "{constraint} constraint takes {} groups, got {actual}",
        describe_bounds(.min, .max)
    )]
    ConstructorGroupsCount {
        /// Constraint type name.
        constraint: String,
        /// Minimum number of groups, if bounded.
        min: Option<usize>,
        /// Maximum number of groups, if bounded.
        max: Option<usize>,
        /// Number of groups supplied.
        actual: usize,
    },

    /// A constraint was built with the wrong parameter names.
    #[error("{constraint} constraint expects params {expected:?}, got {actual:?}")]
    ConstructorParams {
        /// Constraint type name.
        constraint: String,
        /// Required parameter names.
        expected: Vec<String>,
        /// Parameter names supplied.
        actual: Vec<String>,
    },

    /// A constraint could not be evaluated on the given contents.
    #[error("{constraint} constraint cannot verify {contents:?}: {reason}")]
    ConstraintVerification {
        /// Constraint type name.
        constraint: String,
        /// Group contents that were supplied.
        contents: Vec<String>,
        /// Why verification could not run.
        reason: String,
    },

    /// Content could not be converted.
    #[error("cannot apply {converter} to {content:?}")]
    Conversion {
        /// Converter name.
        converter: String,
        /// The content that failed to convert.
        content: String,
    },

    /// Converter name is not known.
    #[error("unknown converter: {0}")]
    UnknownConverter(String),

    /// Line is not part of the rule.
    #[error("unknown line: {0}")]
    UnknownLine(LineId),

    /// Group does not exist in the line's current pattern.
    #[error("unknown group {group} in {line}")]
    UnknownGroup {
        /// The line that was queried.
        line: LineId,
        /// The group number that was not found.
        group: GroupNo,
    },

    /// Constraint is not registered.
    #[error("unknown constraint: {0}")]
    UnknownConstraint(ConstraintId),

    /// Every constraint id up to `u32::MAX` has been handed out.
    #[error("no free constraint id left")]
    ConstraintIdsExhausted,

    /// Guessed pattern index out of range.
    #[error("unknown guess: {0}")]
    UnknownGuess(usize),

    /// Rule has validation errors and cannot be saved.
    #[error("rule is not acceptable: {errors} validation error(s)")]
    RuleNotAcceptable {
        /// Number of blocking errors.
        errors: usize,
    },

    /// Encoding or decoding failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// File system access failed.
    #[error("io error: {0}")]
    Io(String),

    /// The configuration store refused an operation.
    #[error("configuration store error: {0}")]
    ConfigStore(String),
}

fn describe_bounds(min: &Option<usize>, max: &Option<usize>) -> String {
    match (*min, *max) {
        (Some(lo), Some(hi)) if lo == hi => format!("exactly {lo}"),
        (Some(lo), Some(hi)) => format!("{lo} to {hi}"),
        (Some(lo), None) => format!("at least {lo}"),
        (None, Some(hi)) => format!("at most {hi}"),
        (None, None) => "any number of".to_string(),
    }
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Operation that was running.
    pub operation: Option<String>,
    /// Line the operation targeted.
    pub line: Option<LineId>,
    /// Constraint the operation targeted.
    pub constraint: Option<ConstraintId>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the operation name.
    #[must_use]
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    /// Sets the line.
    #[must_use]
    pub fn with_line(mut self, line: LineId) -> Self {
        self.line = Some(line);
        self
    }

    /// Sets the constraint.
    #[must_use]
    pub fn with_constraint(mut self, constraint: ConstraintId) -> Self {
        self.constraint = Some(constraint);
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(op) = &self.operation {
            write!(f, "in {op}")?;
        }
        if let Some(line) = self.line {
            write!(f, " at {line}")?;
        }
        if let Some(constraint) = self.constraint {
            write!(f, " for {constraint}")?;
        }
        Ok(())
    }
}
