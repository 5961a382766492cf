//! Validation results.
//!
//! `validate` calls never fail: they collect problems into a
//! [`ValidationResult`] with two severities. Errors block saving a rule,
//! warnings do not.

/// How serious a validation problem is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Saving is still permitted.
    Warning,
    /// Saving is refused.
    Error,
}

/// Problems found by a `validate` call, split by severity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationResult<P> {
    /// Problems that block saving.
    pub errors: Vec<P>,
    /// Problems that are reported but allow saving.
    pub warnings: Vec<P>,
}

impl<P> Default for ValidationResult<P> {
    fn default() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

impl<P: Ord> ValidationResult<P> {
    /// Creates an empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a sorted result from errors and warnings.
    #[must_use]
    pub fn with_problems(mut errors: Vec<P>, mut warnings: Vec<P>) -> Self {
        errors.sort();
        warnings.sort();
        Self { errors, warnings }
    }

    /// Records a problem with the given severity.
    pub fn push(&mut self, severity: Severity, problem: P) {
        match severity {
            Severity::Error => self.errors.push(problem),
            Severity::Warning => self.warnings.push(problem),
        }
    }

    /// Concatenates results and sorts each severity.
    #[must_use]
    pub fn from_results(results: impl IntoIterator<Item = Self>) -> Self {
        let mut merged = Self::default();
        for result in results {
            merged.errors.extend(result.errors);
            merged.warnings.extend(result.warnings);
        }
        merged.errors.sort();
        merged.warnings.sort();
        merged
    }

    /// Converts every problem into another problem type.
    #[must_use]
    pub fn map<Q: Ord>(self, f: impl Fn(P) -> Q) -> ValidationResult<Q> {
        ValidationResult::with_problems(
            self.errors.into_iter().map(&f).collect(),
            self.warnings.into_iter().map(&f).collect(),
        )
    }

    /// Returns true if no errors were found (warnings are allowed).
    #[must_use]
    pub fn is_acceptable(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns true if neither errors nor warnings were found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }

    /// Returns true if `problem` was reported with any severity.
    #[must_use]
    pub fn contains(&self, problem: &P) -> bool {
        self.errors.contains(problem) || self.warnings.contains(problem)
    }
}
