//! Shared test utilities for flap integration tests.
//!
//! This module provides `TestHarness`, an isolated temp directory holding a
//! scripted resolver that records every invocation.

pub mod harness;

pub use harness::TestHarness;
