//! Integration tests for Layer 2: Constraint
//!
//! Tests for constraint types, their verification, and the linkage graph.
