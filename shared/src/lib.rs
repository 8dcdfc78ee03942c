//! Shared types for the supervisord health check
//!
//! Holds the process and metric model used by the check runner, its
//! collaborators and the test suites, plus the common logging setup.

pub mod types;
pub mod errors;
pub mod logging;

pub use types::*;
pub use errors::*;
