//! Unit tests for hsm-engine
