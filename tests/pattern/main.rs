//! Integration tests for Layer 1: Pattern
//!
//! Tests for regex/span translation, pattern guessing, and the per-line
//! pattern container.

mod regex_match;
mod translate;
