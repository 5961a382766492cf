//! Constraint types.
//!
//! A constraint relates parameter groups of several lines: their contents
//! must be identical, distinct, within a time or value delta, or partially
//! identical. Every [`ConstraintKind`] declares its arity and parameter
//! names up front and [`Constraint::new`] checks both, so a constructed
//! constraint is always well formed. Only [`Constraint::verify`] looks at
//! actual group contents.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::time::Duration;

use chrono::TimeDelta;
use logcause_foundation::{Error, ErrorKind, GroupRef, LineId, Result, ValidationResult, parse_date};

use crate::problem::ConstraintProblem;

/// Lower bound parameter of the delta constraints.
pub const MIN_DELTA: &str = "min_delta";
/// Upper bound parameter of the delta constraints.
pub const MAX_DELTA: &str = "max_delta";
/// Parameter of [`ConstraintKind::Hetero`].
pub const IDENTICAL_GROUPS_COUNT: &str = "identical_groups_count";

/// Constraint parameters by name.
pub type Params = BTreeMap<String, ParamValue>;

// =============================================================================
// Parameter Values
// =============================================================================

/// Value of a constraint parameter.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParamValue {
    /// Unset bound.
    Null,
    /// Integer.
    Int(i64),
    /// Float.
    Float(f64),
    /// Time span.
    Duration(Duration),
}

impl ParamValue {
    /// Returns true for [`ParamValue::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<i64> for ParamValue {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<f64> for ParamValue {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<Duration> for ParamValue {
    fn from(d: Duration) -> Self {
        Self::Duration(d)
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::Duration(d) => write!(f, "{d:?}"),
        }
    }
}

// =============================================================================
// Constraint Kinds
// =============================================================================

/// The closed set of constraint types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum ConstraintKind {
    /// All contents are equal.
    Identical,
    /// The second date follows the first within `[min_delta, max_delta]`.
    TimeDelta,
    /// The second number exceeds the first by a value in `[min_delta, max_delta]`.
    ValueDelta,
    /// All contents are pairwise distinct.
    DifferentValue,
    /// Exactly `identical_groups_count` contents are equal, the rest distinct.
    Hetero,
}

impl ConstraintKind {
    /// All kinds, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Identical,
        Self::TimeDelta,
        Self::ValueDelta,
        Self::DifferentValue,
        Self::Hetero,
    ];

    /// Returns the kind's name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Identical => "identical",
            Self::TimeDelta => "time_delta",
            Self::ValueDelta => "value_delta",
            Self::DifferentValue => "different_value",
            Self::Hetero => "hetero",
        }
    }

    /// Smallest number of groups, `None` if unbounded.
    #[must_use]
    pub const fn min_groups(self) -> Option<usize> {
        Some(2)
    }

    /// Largest number of groups, `None` if unbounded.
    #[must_use]
    pub const fn max_groups(self) -> Option<usize> {
        match self {
            Self::TimeDelta | Self::ValueDelta => Some(2),
            Self::Identical | Self::DifferentValue | Self::Hetero => None,
        }
    }

    /// Returns `(min_groups, max_groups)`.
    #[must_use]
    pub const fn groups_count(self) -> (Option<usize>, Option<usize>) {
        (self.min_groups(), self.max_groups())
    }

    /// Required parameter names, sorted.
    #[must_use]
    pub const fn param_names(self) -> &'static [&'static str] {
        match self {
            Self::Identical | Self::DifferentValue => &[],
            Self::TimeDelta | Self::ValueDelta => &[MAX_DELTA, MIN_DELTA],
            Self::Hetero => &[IDENTICAL_GROUPS_COUNT],
        }
    }

    fn accepts_count(self, count: usize) -> bool {
        self.min_groups().is_none_or(|min| count >= min)
            && self.max_groups().is_none_or(|max| count <= max)
    }

    /// Checks the number of groups against the kind's arity.
    ///
    /// # Errors
    ///
    /// Returns `ConstructorGroupsCount` when the count is out of bounds.
    pub fn check_groups_count(self, actual: usize) -> Result<()> {
        if self.accepts_count(actual) {
            return Ok(());
        }
        Err(Error::new(ErrorKind::ConstructorGroupsCount {
            constraint: self.name().to_string(),
            min: self.min_groups(),
            max: self.max_groups(),
            actual,
        }))
    }

    /// Checks that `params` has exactly the kind's parameter names.
    ///
    /// A time delta also needs at least one of its bounds set.
    ///
    /// # Errors
    ///
    /// Returns `ConstructorParams` when the names differ.
    pub fn check_params(self, params: &Params) -> Result<()> {
        let expected: BTreeSet<&str> = self.param_names().iter().copied().collect();
        let actual: BTreeSet<&str> = params.keys().map(String::as_str).collect();
        let unbounded =
            self == Self::TimeDelta && params.values().all(ParamValue::is_null);
        if expected == actual && !unbounded {
            return Ok(());
        }
        let set: Vec<String> = params
            .iter()
            .filter(|(_, value)| !unbounded || !value.is_null())
            .map(|(name, _)| name.clone())
            .collect();
        Err(Error::new(ErrorKind::ConstructorParams {
            constraint: self.name().to_string(),
            expected: expected.into_iter().map(str::to_string).collect(),
            actual: set,
        }))
    }

    /// Checks group `contents` against the constraint.
    ///
    /// For the delta kinds the first content is the earlier/lower value
    /// and the second the later/greater one.
    ///
    /// # Errors
    ///
    /// Returns `ConstraintVerification` when the number of contents does not
    /// fit the kind, a content does not parse as a date or number, or a
    /// parameter has the wrong type.
    pub fn verify(self, params: &Params, contents: &[String]) -> Result<bool> {
        if !self.accepts_count(contents.len()) {
            return Err(self.verification_error(
                contents,
                format!(
                    "got {} group contents, arity is {:?}",
                    contents.len(),
                    self.groups_count()
                ),
            ));
        }
        match self {
            Self::Identical => Ok(contents.iter().all(|c| *c == contents[0])),
            Self::DifferentValue => {
                let distinct: BTreeSet<&String> = contents.iter().collect();
                Ok(distinct.len() == contents.len())
            }
            Self::TimeDelta => {
                let earlier = self.date(contents, 0)?;
                let later = self.date(contents, 1)?;
                let min = self.time_delta_param(params, MIN_DELTA, contents)?;
                let max = self.time_delta_param(params, MAX_DELTA, contents)?;
                Ok(within(later - earlier, min, max))
            }
            Self::ValueDelta => {
                let lower = self.number(contents, 0)?;
                let greater = self.number(contents, 1)?;
                let min = self.number_param(params, MIN_DELTA, contents)?;
                let max = self.number_param(params, MAX_DELTA, contents)?;
                Ok(within(greater - lower, min, max))
            }
            Self::Hetero => {
                let count = self.count_param(params, contents)?;
                let mut multiplicity: BTreeMap<&str, usize> = BTreeMap::new();
                for content in contents {
                    *multiplicity.entry(content.as_str()).or_default() += 1;
                }
                let repeated: Vec<usize> =
                    multiplicity.into_values().filter(|&n| n > 1).collect();
                Ok(match count {
                    0 | 1 => repeated.is_empty(),
                    n => repeated == [n],
                })
            }
        }
    }

    fn verification_error(self, contents: &[String], reason: impl Into<String>) -> Error {
        Error::constraint_verification(self.name(), contents.to_vec(), reason)
    }

    fn date(self, contents: &[String], idx: usize) -> Result<chrono::NaiveDateTime> {
        parse_date(&contents[idx])
            .ok_or_else(|| self.verification_error(contents, format!("{:?} is not a date", contents[idx])))
    }

    fn number(self, contents: &[String], idx: usize) -> Result<f64> {
        contents[idx]
            .trim()
            .parse()
            .map_err(|_| self.verification_error(contents, format!("{:?} is not a number", contents[idx])))
    }

    fn time_delta_param(
        self,
        params: &Params,
        name: &str,
        contents: &[String],
    ) -> Result<Option<TimeDelta>> {
        let duration = match params.get(name) {
            None | Some(ParamValue::Null) => return Ok(None),
            Some(ParamValue::Duration(d)) => *d,
            Some(ParamValue::Int(secs)) if *secs >= 0 => Duration::from_secs(secs.unsigned_abs()),
            Some(other) => {
                return Err(self.verification_error(
                    contents,
                    format!("{name} = {other} is not a duration"),
                ));
            }
        };
        TimeDelta::from_std(duration)
            .map(Some)
            .map_err(|_| self.verification_error(contents, format!("{name} is out of range")))
    }

    fn number_param(self, params: &Params, name: &str, contents: &[String]) -> Result<Option<f64>> {
        match params.get(name) {
            None | Some(ParamValue::Null) => Ok(None),
            #[allow(clippy::cast_precision_loss)]
            Some(ParamValue::Int(n)) => Ok(Some(*n as f64)),
            Some(ParamValue::Float(n)) => Ok(Some(*n)),
            Some(other) => Err(self.verification_error(
                contents,
                format!("{name} = {other} is not a number"),
            )),
        }
    }

    fn count_param(self, params: &Params, contents: &[String]) -> Result<usize> {
        match params.get(IDENTICAL_GROUPS_COUNT) {
            Some(ParamValue::Int(n)) => usize::try_from(*n).map_err(|_| {
                self.verification_error(contents, format!("{IDENTICAL_GROUPS_COUNT} = {n} is negative"))
            }),
            other => Err(self.verification_error(
                contents,
                format!(
                    "{IDENTICAL_GROUPS_COUNT} = {} is not a count",
                    other.copied().unwrap_or(ParamValue::Null)
                ),
            )),
        }
    }
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn within<T: PartialOrd + Copy>(value: T, min: Option<T>, max: Option<T>) -> bool {
    min.is_none_or(|min| value >= min) && max.is_none_or(|max| value <= max)
}

// =============================================================================
// Constraint
// =============================================================================

/// A constraint over parameter groups of one or more lines.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Constraint {
    kind: ConstraintKind,
    groups: Vec<GroupRef>,
    params: Params,
}

impl Constraint {
    /// Creates a constraint after checking arity and parameter names.
    ///
    /// # Errors
    ///
    /// Returns `ConstructorGroupsCount` or `ConstructorParams`.
    pub fn new(kind: ConstraintKind, groups: Vec<GroupRef>, params: Params) -> Result<Self> {
        kind.check_groups_count(groups.len())?;
        kind.check_params(&params)?;
        Ok(Self {
            kind,
            groups,
            params,
        })
    }

    /// All groups must hold the same content.
    ///
    /// # Errors
    ///
    /// Returns `ConstructorGroupsCount` for fewer than two groups.
    pub fn identical(groups: Vec<GroupRef>) -> Result<Self> {
        Self::new(ConstraintKind::Identical, groups, Params::new())
    }

    /// All groups must hold pairwise distinct contents.
    ///
    /// # Errors
    ///
    /// Returns `ConstructorGroupsCount` for fewer than two groups.
    pub fn different_value(groups: Vec<GroupRef>) -> Result<Self> {
        Self::new(ConstraintKind::DifferentValue, groups, Params::new())
    }

    /// `later` must follow `earlier` by at least `min` and at most `max`.
    ///
    /// # Errors
    ///
    /// Returns `ConstructorParams` if both bounds are `None`.
    pub fn time_delta(
        earlier: GroupRef,
        later: GroupRef,
        min: Option<Duration>,
        max: Option<Duration>,
    ) -> Result<Self> {
        Self::new(
            ConstraintKind::TimeDelta,
            vec![earlier, later],
            delta_params(min.into(), max.into()),
        )
    }

    /// `greater - lower` must lie within `[min, max]`.
    ///
    /// # Errors
    ///
    /// Never fails for two groups; kept fallible like the other constructors.
    pub fn value_delta(
        lower: GroupRef,
        greater: GroupRef,
        min: Option<f64>,
        max: Option<f64>,
    ) -> Result<Self> {
        Self::new(
            ConstraintKind::ValueDelta,
            vec![lower, greater],
            delta_params(min.into(), max.into()),
        )
    }

    /// Exactly `identical_groups_count` groups are equal, the rest distinct.
    ///
    /// # Errors
    ///
    /// Returns `ConstructorGroupsCount` for fewer than two groups.
    pub fn hetero(groups: Vec<GroupRef>, identical_groups_count: usize) -> Result<Self> {
        let count = i64::try_from(identical_groups_count).unwrap_or(i64::MAX);
        let params = Params::from([(IDENTICAL_GROUPS_COUNT.to_string(), ParamValue::Int(count))]);
        Self::new(ConstraintKind::Hetero, groups, params)
    }

    /// The constraint type.
    #[must_use]
    pub fn kind(&self) -> ConstraintKind {
        self.kind
    }

    /// The constrained groups, in constructor order.
    #[must_use]
    pub fn groups(&self) -> &[GroupRef] {
        &self.groups
    }

    /// All parameters.
    #[must_use]
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// One parameter by name.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&ParamValue> {
        self.params.get(name)
    }

    /// Returns true if any constrained group belongs to `line_id`.
    #[must_use]
    pub fn references_line(&self, line_id: LineId) -> bool {
        self.groups.iter().any(|g| g.line_id == line_id)
    }

    /// Checks `contents`, one per group in [`groups`](Self::groups) order.
    ///
    /// # Errors
    ///
    /// See [`ConstraintKind::verify`].
    pub fn verify(&self, contents: &[String]) -> Result<bool> {
        let verified = self.kind.verify(&self.params, contents)?;
        tracing::trace!(constraint = %self, verified, "verified constraint");
        Ok(verified)
    }

    /// Checks the parameters for contradictions.
    #[must_use]
    pub fn validate(&self) -> ValidationResult<ConstraintProblem> {
        let mut result = ValidationResult::new();
        if self.kind == ConstraintKind::TimeDelta {
            if let (Some(ParamValue::Duration(min)), Some(ParamValue::Duration(max))) =
                (self.param(MIN_DELTA), self.param(MAX_DELTA))
            {
                if min > max {
                    let problem = ConstraintProblem::WrongTimeDeltas {
                        min: *min,
                        max: *max,
                    };
                    result.push(problem.severity(), problem);
                }
            }
        }
        result
    }
}

fn delta_params(min: ParamValue, max: ParamValue) -> Params {
    Params::from([(MIN_DELTA.to_string(), min), (MAX_DELTA.to_string(), max)])
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.kind)?;
        for (idx, group) in self.groups.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{group}")?;
        }
        for (name, value) in &self.params {
            write!(f, ", {name}={value}")?;
        }
        f.write_str(")")
    }
}
