//! Configuration for rule teaching.

use logcause_pattern::GuessConfig;

/// Configuration for a [`Teacher`](crate::Teacher).
///
/// Controls pattern guessing and how strict rule validation is.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TeacherConfig {
    /// Heuristics used when a line is added.
    pub guess: GuessConfig,

    /// Smallest number of lines (effect included) a rule needs.
    pub min_line_count: usize,

    /// Whether a parser without a log type is an error rather than a warning.
    pub require_log_type: bool,

    /// Whether `validate` checks constraints against the sample contents.
    pub verify_constraints: bool,
}

impl Default for TeacherConfig {
    fn default() -> Self {
        Self {
            guess: GuessConfig::default(),
            min_line_count: 2,
            require_log_type: false,
            verify_constraints: true,
        }
    }
}

impl TeacherConfig {
    /// Creates a configuration that refuses parsers without a log type.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            require_log_type: true,
            ..Self::default()
        }
    }

    /// Builder method to set the guessing configuration.
    #[must_use]
    pub fn with_guess(mut self, guess: GuessConfig) -> Self {
        self.guess = guess;
        self
    }

    /// Builder method to set the minimum line count.
    #[must_use]
    pub fn with_min_line_count(mut self, count: usize) -> Self {
        self.min_line_count = count;
        self
    }

    /// Builder method to require log types.
    #[must_use]
    pub fn with_require_log_type(mut self, required: bool) -> Self {
        self.require_log_type = required;
        self
    }

    /// Builder method to enable/disable constraint verification.
    #[must_use]
    pub fn with_verify_constraints(mut self, enabled: bool) -> Self {
        self.verify_constraints = enabled;
        self
    }
}
