//! The rule orchestrator.
//!
//! A [`Teacher`] owns every piece of one rule being taught: a pattern
//! container per line, the registered constraints, and the linkage graph
//! between them. It keeps them consistent across edits:
//!
//! - removing a line removes every constraint touching it, before the line
//! - changing a line's pattern removes every constraint touching the line,
//!   even when the new regex captures the same groups
//! - re-registering a constraint id replaces the old constraint and its links
//!
//! Editing calls only fail on contract violations (unknown ids, regexes
//! that do not compile). Everything a user passes through while typing is
//! reported by [`Teacher::validate`].

use std::collections::{BTreeMap, BTreeSet};

use logcause_constraint::{Constraint, ConstraintLinks, ConstraintProblem};
use logcause_foundation::{
    ConstraintId, Converter, Error, ErrorContext, ErrorKind, GroupNo, LineId, Result, Severity,
    ValidationResult,
};
use logcause_pattern::{PatternMatch, RegexMatch};

use crate::config::TeacherConfig;
use crate::intent::{ConstraintIntent, ParserIntent, RuleIntent};
use crate::line::SampleLine;
use crate::problem::{ParserProblem, RuleProblem, RuleValidationResult};
use crate::store::{ConfigStore, MemoryConfigStore};

// =============================================================================
// Teacher Parser
// =============================================================================

/// One line of a rule: the sample, its pattern, and parser settings.
#[derive(Clone, Debug)]
pub struct TeacherParser {
    line: SampleLine,
    regex_match: RegexMatch,
    name: String,
    log_type: Option<String>,
}

impl TeacherParser {
    /// The sample line.
    #[must_use]
    pub fn line(&self) -> &SampleLine {
        &self.line
    }

    /// The line's pattern container.
    #[must_use]
    pub fn regex_match(&self) -> &RegexMatch {
        &self.regex_match
    }

    /// Parser name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Log type, if chosen.
    #[must_use]
    pub fn log_type(&self) -> Option<&str> {
        self.log_type.as_deref()
    }

    fn to_intent(&self) -> ParserIntent {
        ParserIntent {
            name: self.name.clone(),
            pattern: self.regex_match.regex().to_string(),
            log_type: self.log_type.clone(),
            primary_key: self.regex_match.primary_key().to_vec(),
            groups: self
                .regex_match
                .param_groups()
                .iter()
                .map(|(group_no, group)| (*group_no, group.clone()))
                .collect(),
            line_content: self.line.content.clone(),
            line_offset: self.line.offset,
            line_source: self.line.source.clone(),
        }
    }
}

// =============================================================================
// Teacher
// =============================================================================

/// Orchestrates teaching one rule.
///
/// One teacher per editing session; it is not meant to be shared.
#[derive(Clone, Debug)]
pub struct Teacher<S = MemoryConfigStore> {
    store: S,
    config: TeacherConfig,
    parsers: BTreeMap<LineId, TeacherParser>,
    constraints: BTreeMap<ConstraintId, Constraint>,
    links: ConstraintLinks,
    effect_id: Option<LineId>,
    /// `None` once `u32::MAX` has been registered.
    next_constraint_id: Option<ConstraintId>,
}

fn context(operation: &str) -> ErrorContext {
    ErrorContext::new().with_operation(operation)
}

impl<S: ConfigStore> Teacher<S> {
    /// Creates a teacher with the default configuration.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self::with_config(store, TeacherConfig::default())
    }

    /// Creates a teacher with the given configuration.
    #[must_use]
    pub fn with_config(store: S, config: TeacherConfig) -> Self {
        Self {
            store,
            config,
            parsers: BTreeMap::new(),
            constraints: BTreeMap::new(),
            links: ConstraintLinks::new(),
            effect_id: None,
            next_constraint_id: Some(ConstraintId(0)),
        }
    }

    /// The configuration.
    #[must_use]
    pub fn config(&self) -> &TeacherConfig {
        &self.config
    }

    /// The configuration store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consumes the teacher, returning its store.
    #[must_use]
    pub fn into_store(self) -> S {
        self.store
    }

    /// The effect line, if one is marked.
    #[must_use]
    pub fn effect_id(&self) -> Option<LineId> {
        self.effect_id
    }

    /// Ids of all lines, ascending.
    pub fn line_ids(&self) -> impl Iterator<Item = LineId> + '_ {
        self.parsers.keys().copied()
    }

    /// One line's parser.
    ///
    /// # Errors
    ///
    /// Returns `UnknownLine` if the line is not part of the rule.
    pub fn parser(&self, line_id: LineId) -> Result<&TeacherParser> {
        self.parsers
            .get(&line_id)
            .ok_or_else(|| Error::unknown_line(line_id).with_context(context("parser")))
    }

    /// One line's current pattern and groups.
    ///
    /// # Errors
    ///
    /// Returns `UnknownLine` if the line is not part of the rule.
    pub fn pattern_match(&self, line_id: LineId) -> Result<&PatternMatch> {
        Ok(self.parser(line_id)?.regex_match.pattern_match())
    }

    /// One registered constraint.
    ///
    /// # Errors
    ///
    /// Returns `UnknownConstraint` if the id is not registered.
    pub fn constraint(&self, constraint_id: ConstraintId) -> Result<&Constraint> {
        self.constraints.get(&constraint_id).ok_or_else(|| {
            Error::unknown_constraint(constraint_id).with_context(context("constraint"))
        })
    }

    /// All registered constraints.
    #[must_use]
    pub fn constraints(&self) -> &BTreeMap<ConstraintId, Constraint> {
        &self.constraints
    }

    /// The linkage graph between groups and constraints.
    #[must_use]
    pub fn links(&self) -> &ConstraintLinks {
        &self.links
    }

    fn parser_mut(&mut self, line_id: LineId, operation: &str) -> Result<&mut TeacherParser> {
        self.parsers
            .get_mut(&line_id)
            .ok_or_else(|| Error::unknown_line(line_id).with_context(context(operation)))
    }

    fn names_blacklist(&self) -> BTreeSet<String> {
        self.parsers.values().map(|p| p.name.clone()).collect()
    }

    // -------------------------------------------------------------------------
    // Lines
    // -------------------------------------------------------------------------

    /// Adds a line, replacing any line with the same id.
    ///
    /// A replaced line is fully removed first, constraints included. The new
    /// line starts on its most literal guess with a proposed unique name.
    pub fn add_line(&mut self, line_id: LineId, line: SampleLine, is_effect: bool) {
        if self.parsers.contains_key(&line_id) {
            self.remove_parser(line_id);
        }
        let regex_match = RegexMatch::new(line_id, &line.content, &self.config.guess);
        let name = self.store.propose_parser_name(
            &line.content,
            regex_match.regex(),
            &self.names_blacklist(),
        );
        if is_effect {
            self.effect_id = Some(line_id);
        }
        tracing::debug!(line = %line_id, %name, is_effect, "added line");
        self.parsers.insert(
            line_id,
            TeacherParser {
                line,
                regex_match,
                name,
                log_type: None,
            },
        );
    }

    /// Removes a line and every constraint referencing it.
    ///
    /// # Errors
    ///
    /// Returns `UnknownLine` if the line is not part of the rule.
    pub fn remove_line(&mut self, line_id: LineId) -> Result<()> {
        if !self.parsers.contains_key(&line_id) {
            return Err(Error::unknown_line(line_id).with_context(context("remove_line")));
        }
        self.remove_parser(line_id);
        Ok(())
    }

    fn remove_parser(&mut self, line_id: LineId) {
        let removed = self.remove_constraints_by_line(line_id);
        self.parsers.remove(&line_id);
        if self.effect_id == Some(line_id) {
            self.effect_id = None;
        }
        tracing::debug!(line = %line_id, constraints = removed.len(), "removed line");
    }

    /// Sets a line's regex and drops every constraint referencing the line.
    ///
    /// A regex that compiles but does not match is kept;
    /// [`validate`](Self::validate) reports it.
    ///
    /// # Errors
    ///
    /// Returns `UnknownLine`, or `InvalidRegex` if the regex does not
    /// compile. Nothing changes on error.
    pub fn update_pattern(&mut self, line_id: LineId, regex: &str) -> Result<()> {
        self.parser_mut(line_id, "update_pattern")?
            .regex_match
            .update_by_regex(regex)
            .map_err(|e| e.with_context(context("update_pattern").with_line(line_id)))?;
        let removed = self.remove_constraints_by_line(line_id);
        tracing::debug!(line = %line_id, regex, constraints = removed.len(), "updated pattern");
        Ok(())
    }

    /// Regexes guessed for a line, most specific first.
    ///
    /// # Errors
    ///
    /// Returns `UnknownLine` if the line is not part of the rule.
    pub fn guess_patterns(&self, line_id: LineId) -> Result<Vec<String>> {
        Ok(self
            .guessed_pattern_matches(line_id)?
            .values()
            .map(|guess| guess.pattern.clone())
            .collect())
    }

    /// Guesses for a line, keyed by guess id.
    ///
    /// # Errors
    ///
    /// Returns `UnknownLine` if the line is not part of the rule.
    pub fn guessed_pattern_matches(
        &self,
        line_id: LineId,
    ) -> Result<&BTreeMap<usize, PatternMatch>> {
        Ok(self.parser(line_id)?.regex_match.guessed_pattern_matches())
    }

    /// Switches a line to one of its guesses and drops every constraint
    /// referencing the line.
    ///
    /// # Errors
    ///
    /// Returns `UnknownLine` or `UnknownGuess`. Nothing changes on error.
    pub fn choose_guessed_pattern(&mut self, line_id: LineId, guess_id: usize) -> Result<()> {
        self.parser_mut(line_id, "choose_guessed_pattern")?
            .regex_match
            .update_by_guessed_regex(guess_id)
            .map_err(|e| e.with_context(context("choose_guessed_pattern").with_line(line_id)))?;
        let removed = self.remove_constraints_by_line(line_id);
        tracing::debug!(line = %line_id, guess_id, constraints = removed.len(), "chose guess");
        Ok(())
    }

    /// Renames a line's parser. Uniqueness is checked by [`validate`](Self::validate).
    ///
    /// # Errors
    ///
    /// Returns `UnknownLine` if the line is not part of the rule.
    pub fn set_pattern_name(&mut self, line_id: LineId, name: impl Into<String>) -> Result<()> {
        let parser = self.parser_mut(line_id, "set_pattern_name")?;
        parser.name = name.into();
        tracing::debug!(line = %line_id, name = %parser.name, "renamed parser");
        Ok(())
    }

    /// Sets the log type a line's parser applies to.
    ///
    /// # Errors
    ///
    /// Returns `UnknownLine` if the line is not part of the rule.
    pub fn set_log_type(&mut self, line_id: LineId, log_type: impl Into<String>) -> Result<()> {
        let parser = self.parser_mut(line_id, "set_log_type")?;
        parser.log_type = Some(log_type.into());
        Ok(())
    }

    /// Sets the converter of one group.
    ///
    /// # Errors
    ///
    /// Returns `UnknownLine` or `UnknownGroup`.
    pub fn set_converter(
        &mut self,
        line_id: LineId,
        group_no: GroupNo,
        converter: Converter,
    ) -> Result<()> {
        self.parser_mut(line_id, "set_converter")?
            .regex_match
            .set_converter(group_no, converter)
            .map_err(|e| e.with_context(context("set_converter").with_line(line_id)))?;
        tracing::debug!(line = %line_id, group_no, %converter, "set converter");
        Ok(())
    }

    /// Sets a line's primary key. Bounds are checked by [`validate`](Self::validate).
    ///
    /// # Errors
    ///
    /// Returns `UnknownLine` if the line is not part of the rule.
    pub fn set_primary_key(&mut self, line_id: LineId, groups: Vec<GroupNo>) -> Result<()> {
        self.parser_mut(line_id, "set_primary_key")?
            .regex_match
            .set_primary_key(groups);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Constraints
    // -------------------------------------------------------------------------

    /// Registers a constraint under `constraint_id`, replacing any constraint
    /// already registered there.
    ///
    /// # Errors
    ///
    /// Returns `UnknownLine` or `UnknownGroup` if the constraint references a
    /// group the current patterns do not have. Nothing changes on error.
    pub fn register_constraint(
        &mut self,
        constraint_id: ConstraintId,
        constraint: Constraint,
    ) -> Result<()> {
        self.check_constraint_groups(&constraint).map_err(|e| {
            e.with_context(context("register_constraint").with_constraint(constraint_id))
        })?;
        if self.constraints.contains_key(&constraint_id) {
            self.deregister(constraint_id);
        }
        tracing::debug!(constraint = %constraint_id, %constraint, "registered constraint");
        self.links.add_constraint(constraint_id, &constraint);
        self.constraints.insert(constraint_id, constraint);
        if self.next_constraint_id.is_some_and(|next| constraint_id >= next) {
            self.next_constraint_id = constraint_id.checked_next();
        }
        Ok(())
    }

    /// Registers a constraint under a fresh id.
    ///
    /// # Errors
    ///
    /// Returns `ConstraintIdsExhausted` once `u32::MAX` has been registered,
    /// otherwise the same as [`register_constraint`](Self::register_constraint).
    pub fn add_constraint(&mut self, constraint: Constraint) -> Result<ConstraintId> {
        let constraint_id = self.next_constraint_id.ok_or_else(|| {
            Error::new(ErrorKind::ConstraintIdsExhausted).with_context(context("add_constraint"))
        })?;
        self.register_constraint(constraint_id, constraint)?;
        Ok(constraint_id)
    }

    /// Removes a constraint and its links.
    ///
    /// # Errors
    ///
    /// Returns `UnknownConstraint` if the id is not registered.
    pub fn remove_constraint(&mut self, constraint_id: ConstraintId) -> Result<()> {
        if !self.constraints.contains_key(&constraint_id) {
            return Err(Error::unknown_constraint(constraint_id)
                .with_context(context("remove_constraint")));
        }
        self.deregister(constraint_id);
        Ok(())
    }

    /// Removes every constraint referencing one group and returns their ids.
    pub fn remove_constraints_by_group(
        &mut self,
        line_id: LineId,
        group_no: GroupNo,
    ) -> Vec<ConstraintId> {
        let removed = self.links.remove_by_group(line_id, group_no);
        for constraint_id in &removed {
            self.deregister(*constraint_id);
        }
        removed
    }

    fn remove_constraints_by_line(&mut self, line_id: LineId) -> Vec<ConstraintId> {
        let removed = self.links.remove_by_line(line_id);
        for constraint_id in &removed {
            self.deregister(*constraint_id);
        }
        removed
    }

    /// Links first, then the map entry.
    fn deregister(&mut self, constraint_id: ConstraintId) -> Option<Constraint> {
        self.links.remove_by_constraint(constraint_id);
        let removed = self.constraints.remove(&constraint_id);
        tracing::debug!(constraint = %constraint_id, "removed constraint");
        removed
    }

    fn check_constraint_groups(&self, constraint: &Constraint) -> Result<()> {
        for group in constraint.groups() {
            let parser = self
                .parsers
                .get(&group.line_id)
                .ok_or_else(|| Error::unknown_line(group.line_id))?;
            if !parser.regex_match.param_groups().contains_key(&group.group_no) {
                return Err(Error::unknown_group(group.line_id, group.group_no));
            }
        }
        Ok(())
    }

    fn group_contents(&self, constraint: &Constraint) -> Result<Vec<String>> {
        constraint
            .groups()
            .iter()
            .map(|group| {
                self.parsers
                    .get(&group.line_id)
                    .and_then(|p| p.regex_match.param_groups().get(&group.group_no))
                    .map(|g| g.content.clone())
                    .ok_or_else(|| Error::unknown_group(group.line_id, group.group_no))
            })
            .collect()
    }

    // -------------------------------------------------------------------------
    // Validation and export
    // -------------------------------------------------------------------------

    /// Collects every problem of the rule, its parsers, and its constraints.
    #[must_use]
    pub fn validate(&self) -> RuleValidationResult {
        let result = RuleValidationResult {
            rule_problems: self.validate_rule(),
            parser_problems: self.validate_parsers(),
            constraint_problems: self.validate_constraints(),
        };
        tracing::debug!(
            errors = result.error_count(),
            warnings = result.warning_count(),
            "validated rule"
        );
        result
    }

    fn validate_rule(&self) -> ValidationResult<RuleProblem> {
        let mut result = ValidationResult::new();
        if !self
            .effect_id
            .is_some_and(|id| self.parsers.contains_key(&id))
        {
            result.push(Severity::Error, RuleProblem::NoEffectParser);
        }
        if self.parsers.len() < self.config.min_line_count {
            result.push(
                Severity::Error,
                RuleProblem::ParserCount {
                    count: self.parsers.len(),
                    min: self.config.min_line_count,
                },
            );
        }
        result
    }

    fn validate_parsers(&self) -> BTreeMap<LineId, ValidationResult<ParserProblem>> {
        let mut name_counts: BTreeMap<&str, usize> = BTreeMap::new();
        for parser in self.parsers.values() {
            *name_counts.entry(parser.name.as_str()).or_default() += 1;
        }
        let log_type_severity = if self.config.require_log_type {
            Severity::Error
        } else {
            Severity::Warning
        };

        self.parsers
            .iter()
            .filter_map(|(line_id, parser)| {
                let mut result = parser.regex_match.validate().map(ParserProblem::Pattern);
                if name_counts.get(parser.name.as_str()).is_some_and(|&n| n > 1) {
                    result.push(
                        Severity::Error,
                        ParserProblem::NotUniqueName {
                            name: parser.name.clone(),
                        },
                    );
                }
                if parser.log_type.is_none() {
                    result.push(log_type_severity, ParserProblem::NotSetLogType);
                }
                (!result.is_empty()).then_some((*line_id, result))
            })
            .collect()
    }

    fn validate_constraints(&self) -> BTreeMap<ConstraintId, ValidationResult<ConstraintProblem>> {
        self.constraints
            .iter()
            .filter_map(|(constraint_id, constraint)| {
                let mut result = constraint.validate();
                if self.config.verify_constraints {
                    if let Some(problem) = self.verify_constraint(constraint) {
                        result.push(problem.severity(), problem);
                    }
                }
                (!result.is_empty()).then_some((*constraint_id, result))
            })
            .collect()
    }

    fn verify_constraint(&self, constraint: &Constraint) -> Option<ConstraintProblem> {
        let contents = match self.group_contents(constraint) {
            Ok(contents) => contents,
            Err(err) => {
                return Some(ConstraintProblem::Unverifiable {
                    reason: err.to_string(),
                });
            }
        };
        match constraint.verify(&contents) {
            Ok(true) => None,
            Ok(false) => Some(ConstraintProblem::VerificationFailed { contents }),
            Err(err) => Some(ConstraintProblem::Unverifiable {
                reason: err.to_string(),
            }),
        }
    }

    /// Exports the current state of the rule. Never mutates.
    #[must_use]
    pub fn get_rule(&self) -> RuleIntent {
        RuleIntent {
            effect_id: self.effect_id,
            parsers: self
                .parsers
                .iter()
                .map(|(line_id, parser)| (*line_id, parser.to_intent()))
                .collect(),
            constraints: self
                .constraints
                .values()
                .map(ConstraintIntent::from)
                .collect(),
        }
    }

    /// Validates the rule and hands it to the configuration store.
    ///
    /// # Errors
    ///
    /// Returns `RuleNotAcceptable` if validation found errors (warnings do
    /// not block), or whatever the store's `add_rule` returns.
    pub fn save(&mut self) -> Result<()> {
        let validation = self.validate();
        if !validation.is_acceptable() {
            return Err(Error::new(ErrorKind::RuleNotAcceptable {
                errors: validation.error_count(),
            })
            .with_context(context("save")));
        }
        let rule = self.get_rule();
        self.store.add_rule(&rule)?;
        tracing::debug!(parsers = rule.parsers.len(), constraints = rule.constraints.len(), "saved rule");
        Ok(())
    }
}
