//! Unit tests for registry orchestration.
