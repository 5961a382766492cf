//! Configuration for pattern guessing.

/// Which heuristics [`guess_pattern_matches`](crate::guess_pattern_matches) runs.
///
/// The fully literal guess is always produced, whatever the configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GuessConfig {
    /// Capture a leading timestamp as a group.
    pub date_guesses: bool,
    /// Capture standalone digit runs as groups.
    pub number_guesses: bool,
    /// Capture the remainder of the line with `(.*)`.
    pub catch_all_guess: bool,
    /// Upper bound on the number of guesses kept (at least 1).
    pub max_guesses: usize,
}

impl Default for GuessConfig {
    fn default() -> Self {
        Self {
            date_guesses: true,
            number_guesses: true,
            catch_all_guess: true,
            max_guesses: 8,
        }
    }
}

impl GuessConfig {
    /// Creates a configuration that only proposes the literal guess.
    #[must_use]
    pub fn literal_only() -> Self {
        Self {
            date_guesses: false,
            number_guesses: false,
            catch_all_guess: false,
            max_guesses: 1,
        }
    }

    /// Builder method to enable/disable timestamp guesses.
    #[must_use]
    pub fn with_date_guesses(mut self, enabled: bool) -> Self {
        self.date_guesses = enabled;
        self
    }

    /// Builder method to enable/disable digit-run guesses.
    #[must_use]
    pub fn with_number_guesses(mut self, enabled: bool) -> Self {
        self.number_guesses = enabled;
        self
    }

    /// Builder method to enable/disable the catch-all guess.
    #[must_use]
    pub fn with_catch_all_guess(mut self, enabled: bool) -> Self {
        self.catch_all_guess = enabled;
        self
    }

    /// Builder method to set the maximum number of guesses.
    #[must_use]
    pub fn with_max_guesses(mut self, max: usize) -> Self {
        self.max_guesses = max.max(1);
        self
    }
}
