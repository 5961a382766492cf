//! Core types for logcause.
//!
//! This crate provides:
//! - [`LineId`], [`ConstraintId`], [`GroupRef`] - Identifiers shared by every layer
//! - [`Span`] - Half-open text intervals tagged with a regex fragment
//! - [`Converter`] - Named conversions applied to captured parameters
//! - [`ValidationResult`] - Errors and warnings collected by `validate` calls
//! - [`Error`] - Rich error types with context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod converter;
pub mod error;
pub mod ids;
pub mod span;
pub mod validation;

pub use converter::{Converter, Value, parse_date};
pub use error::{Error, ErrorContext, ErrorKind, Result};
pub use ids::{ConstraintId, GroupNo, GroupRef, LineId};
pub use span::Span;
pub use validation::{Severity, ValidationResult};
