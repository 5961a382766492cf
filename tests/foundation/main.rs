//! Integration tests for Layer 0: Foundation
//!
//! Tests for core types: spans, converters, validation results, and errors.

mod errors;
