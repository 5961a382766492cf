//! Constraints between parameter groups of different lines.
//!
//! This crate provides:
//! - [`Constraint`] - A relation over parameter groups, checked against sample contents
//! - [`ConstraintKind`] - The closed set of constraint types and their arity/parameter contracts
//! - [`ConstraintLinks`] - Index from `(line, group)` to the constraints referencing it
//! - [`ConstraintProblem`] - Problems reported by [`Constraint::validate`]

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod constraint;
pub mod links;
pub mod problem;

pub use constraint::{Constraint, ConstraintKind, ParamValue, Params};
pub use links::ConstraintLinks;
pub use problem::ConstraintProblem;
