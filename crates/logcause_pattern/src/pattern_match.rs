//! Per-line pattern containers.
//!
//! A [`RegexMatch`] owns the current regex of one sample line and the
//! parameter groups it captures. Every regex change rebuilds the whole
//! group map, so group numbers always equal capture ordinals `1..=N`.

use std::collections::BTreeMap;

use im::OrdMap;
use logcause_foundation::{Converter, Error, ErrorKind, GroupNo, LineId, Result, ValidationResult};

use crate::config::GuessConfig;
use crate::guessing::guess_pattern_matches;
use crate::problem::PatternProblem;
use crate::translate::{anchor, compile_anchored, regex_groups, verify_regex};

/// One captured parameter: its sample content and how to convert it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParamGroup {
    /// Text captured from the sample line.
    pub content: String,
    /// Conversion applied to the content.
    pub converter: Converter,
}

impl ParamGroup {
    /// Creates a group with the given converter.
    #[must_use]
    pub fn new(content: impl Into<String>, converter: Converter) -> Self {
        Self {
            content: content.into(),
            converter,
        }
    }

    /// Returns true if the content converts under the group's converter.
    #[must_use]
    pub fn is_convertible(&self) -> bool {
        self.converter.accepts(&self.content)
    }
}

/// Parameter groups keyed by capture ordinal.
pub type ParamGroups = OrdMap<GroupNo, ParamGroup>;

/// A regex together with the groups it captures from a line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatternMatch {
    /// The sample line.
    pub line_text: String,
    /// Anchored regex.
    pub pattern: String,
    /// Captured groups, keyed `1..=N`.
    pub param_groups: ParamGroups,
    /// Group numbers forming the primary key.
    pub primary_key: Vec<GroupNo>,
}

impl PatternMatch {
    /// Builds a pattern match whose groups are captured by `regex`.
    ///
    /// All groups get the string converter and the primary key is the
    /// smallest group number.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRegex` or `NotMatchingRegex` from the translator.
    pub fn from_regex(line_text: &str, regex: &str) -> Result<Self> {
        let contents = regex_groups(regex, line_text)?;
        let param_groups: ParamGroups = contents
            .into_iter()
            .enumerate()
            .map(|(idx, content)| (idx + 1, ParamGroup::new(content, Converter::String)))
            .collect();
        Ok(Self {
            line_text: line_text.to_string(),
            pattern: regex.to_string(),
            primary_key: default_primary_key(&param_groups),
            param_groups,
        })
    }

    /// A pattern that does not match its line: no groups, no primary key.
    #[must_use]
    pub fn unmatched(line_text: &str, regex: &str) -> Self {
        Self {
            line_text: line_text.to_string(),
            pattern: regex.to_string(),
            param_groups: ParamGroups::new(),
            primary_key: Vec::new(),
        }
    }

    /// Returns the group numbers in ascending order.
    #[must_use]
    pub fn group_numbers(&self) -> Vec<GroupNo> {
        self.param_groups.keys().copied().collect()
    }
}

/// The smallest group number, or nothing when there are no groups.
#[must_use]
pub fn default_primary_key(groups: &ParamGroups) -> Vec<GroupNo> {
    groups.keys().next().copied().into_iter().collect()
}

/// Container for a line and its current regex.
///
/// Keeps regex, parameter groups and primary key consistent across edits.
/// A regex that stops matching is kept (the user may still be typing) and
/// reported by [`validate`](Self::validate); only a regex that does not
/// compile is refused.
#[derive(Clone, Debug)]
pub struct RegexMatch {
    line_id: LineId,
    current: PatternMatch,
    guessed: BTreeMap<usize, PatternMatch>,
}

impl RegexMatch {
    /// Creates the container, computes guesses, and selects guess 0.
    #[must_use]
    pub fn new(line_id: LineId, line_text: &str, config: &GuessConfig) -> Self {
        let guessed: BTreeMap<usize, PatternMatch> = guess_pattern_matches(line_text, config)
            .into_iter()
            .enumerate()
            .collect();
        let current = guessed
            .get(&0)
            .cloned()
            .unwrap_or_else(|| PatternMatch::unmatched(line_text, "^$"));
        Self {
            line_id,
            current,
            guessed,
        }
    }

    /// The line this container belongs to.
    #[must_use]
    pub fn line_id(&self) -> LineId {
        self.line_id
    }

    /// The sample line.
    #[must_use]
    pub fn line_text(&self) -> &str {
        &self.current.line_text
    }

    /// The current regex.
    #[must_use]
    pub fn regex(&self) -> &str {
        &self.current.pattern
    }

    /// The current parameter groups.
    #[must_use]
    pub fn param_groups(&self) -> &ParamGroups {
        &self.current.param_groups
    }

    /// The current primary key.
    #[must_use]
    pub fn primary_key(&self) -> &[GroupNo] {
        &self.current.primary_key
    }

    /// Snapshot of the current regex, groups and primary key.
    #[must_use]
    pub fn pattern_match(&self) -> &PatternMatch {
        &self.current
    }

    /// Guessed alternatives, ranked most specific first.
    #[must_use]
    pub fn guessed_pattern_matches(&self) -> &BTreeMap<usize, PatternMatch> {
        &self.guessed
    }

    /// Replaces the regex, anchoring it with `^`/`$` if needed.
    ///
    /// When the regex matches, groups are rebuilt with the string converter
    /// and the primary key is reset to the smallest group. When it does not
    /// match, the regex is still stored but groups and primary key become
    /// empty.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRegex` if the regex does not compile; the container
    /// is left unchanged.
    pub fn update_by_regex(&mut self, new_regex: &str) -> Result<()> {
        let regex = anchor(new_regex);
        compile_anchored(&regex)?;
        self.current = match PatternMatch::from_regex(self.line_text(), &regex) {
            Ok(pattern_match) => pattern_match,
            Err(Error {
                kind: ErrorKind::NotMatchingRegex { .. },
                ..
            }) => {
                tracing::debug!(line = %self.line_id, regex = %regex, "pattern does not match line");
                PatternMatch::unmatched(self.line_text(), &regex)
            }
            Err(err) => return Err(err),
        };
        Ok(())
    }

    /// Replaces regex, groups and primary key with a guessed alternative.
    ///
    /// # Errors
    ///
    /// Returns `UnknownGuess` if there is no guess with that id.
    pub fn update_by_guessed_regex(&mut self, guess_id: usize) -> Result<()> {
        let guess = self
            .guessed
            .get(&guess_id)
            .ok_or_else(|| Error::new(ErrorKind::UnknownGuess(guess_id)))?;
        self.current = guess.clone();
        Ok(())
    }

    /// Sets the converter of one group. Nothing is revalidated.
    ///
    /// # Errors
    ///
    /// Returns `UnknownGroup` if the pattern has no such group.
    pub fn set_converter(&mut self, group_no: GroupNo, converter: Converter) -> Result<()> {
        let group = self
            .current
            .param_groups
            .get_mut(&group_no)
            .ok_or_else(|| Error::unknown_group(self.line_id, group_no))?;
        group.converter = converter;
        Ok(())
    }

    /// Replaces the primary key. Bounds are only checked by [`validate`](Self::validate).
    pub fn set_primary_key(&mut self, groups: Vec<GroupNo>) {
        self.current.primary_key = groups;
    }

    /// Checks that the regex matches the line, that every group converts
    /// under its converter, and that the primary key only names existing
    /// groups.
    #[must_use]
    pub fn validate(&self) -> ValidationResult<PatternProblem> {
        ValidationResult::from_results([
            self.validate_pattern(),
            self.validate_converters(),
            self.validate_primary_key(),
        ])
    }

    fn validate_pattern(&self) -> ValidationResult<PatternProblem> {
        let mut result = ValidationResult::new();
        if verify_regex(self.regex(), self.line_text()).is_err() {
            let problem = PatternProblem::NotMatchingPattern {
                line_id: self.line_id,
            };
            result.push(problem.severity(), problem);
        }
        result
    }

    fn validate_converters(&self) -> ValidationResult<PatternProblem> {
        let mut result = ValidationResult::new();
        for (group_no, group) in &self.current.param_groups {
            if !group.is_convertible() {
                let problem = PatternProblem::WrongConverter {
                    line_id: self.line_id,
                    group_no: *group_no,
                    content: group.content.clone(),
                    converter: group.converter,
                };
                result.push(problem.severity(), problem);
            }
        }
        result
    }

    fn validate_primary_key(&self) -> ValidationResult<PatternProblem> {
        let mut result = ValidationResult::new();
        let valid = self
            .current
            .primary_key
            .iter()
            .all(|group_no| self.current.param_groups.contains_key(group_no));
        if !valid {
            let problem = PatternProblem::InvalidPrimaryKey {
                line_id: self.line_id,
                primary_key: self.current.primary_key.clone(),
                groups: self.current.group_numbers(),
            };
            result.push(problem.severity(), problem);
        }
        result
    }
}
