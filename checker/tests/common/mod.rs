//! Common test utilities and infrastructure
//!
//! Shared fixtures, a recording metrics sink, and mock builders used across
//! the check test suites.

#![allow(dead_code)] // Not every suite uses every helper

pub mod fixtures;
pub mod helpers;

// Re-export commonly used items for convenience
#[allow(unused_imports)]
pub use fixtures::TestFixtures;
#[allow(unused_imports)]
pub use helpers::{CheckBuilder, Emission, RecordingSink, Remote, TestHelpers};
