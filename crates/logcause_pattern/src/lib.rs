//! Pattern guessing and regex/span translation for logcause.
//!
//! This crate provides:
//! - [`translate`] - Conversion between regexes and parameter spans of a sample line
//! - [`guessing`] - Ranked regex proposals for a raw line
//! - [`RegexMatch`] - The per-line container keeping regex and parameter groups consistent
//! - [`PatternProblem`] - Problems reported by [`RegexMatch::validate`]

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod guessing;
pub mod pattern_match;
pub mod problem;
pub mod translate;

pub use config::GuessConfig;
pub use guessing::guess_pattern_matches;
pub use pattern_match::{ParamGroup, ParamGroups, PatternMatch, RegexMatch};
pub use problem::PatternProblem;
pub use translate::{
    anchor, create_date_regex, create_obvious_regex, regex_from_spans, regex_groups,
    spans_from_regex, verify_regex,
};
