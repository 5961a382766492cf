//! Rule teaching for logcause.
//!
//! A [`Teacher`] holds one rule being taught: an effect line, its cause
//! lines, a pattern for each, and constraints linking their parameters.
//!
//! This crate provides:
//! - [`Teacher`] - The rule orchestrator
//! - [`ConfigStore`] - Parser naming and rule persistence, with [`MemoryConfigStore`]
//! - [`RuleIntent`] - The exported form of a rule
//! - [`RuleValidationResult`] - Problems found across the whole rule
//! - [`serialize`] - `MessagePack` encoding of exported rules

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod intent;
pub mod line;
pub mod problem;
pub mod serialize;
pub mod store;
pub mod teacher;

pub use config::TeacherConfig;
pub use intent::{ConstraintIntent, ParserIntent, RuleIntent};
pub use line::{LineSource, SampleLine};
pub use problem::{ParserProblem, RuleProblem, RuleValidationResult};
pub use store::{ConfigStore, MemoryConfigStore, propose_name};
pub use teacher::{Teacher, TeacherParser};
