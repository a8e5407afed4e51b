//! Shared test utilities for printjob-history integration tests.
//!
//! This module provides:
//! - `TestHarness` for an isolated on-disk history with a controllable clock
//! - Builders and fake providers for creating test data programmatically

pub mod builders;
pub mod harness;

pub use builders::*;
pub use harness::{jan_first, ManualClock, TestHarness};
