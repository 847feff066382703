//! Unit tests for the pickup lifecycle.
