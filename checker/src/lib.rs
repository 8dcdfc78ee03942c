//! Supervisord health check library
//!
//! Queries a supervisord control interface for a configured list of
//! processes, classifies each process state into a health level, and emits
//! per-process service checks and uptime gauges plus aggregate counts to a
//! metrics sink.

pub mod error;
pub mod types;
pub mod traits;
pub mod config;
pub mod core;
pub mod check_impl;
pub mod scheduler;
pub mod services;

// Re-export main types
pub use error::{CheckError, CheckResult};
pub use types::*;
pub use traits::*;
pub use config::{CheckConfig, ConnectionConfig, Credentials, InstanceConfig};
pub use check_impl::SupervisordCheck;
pub use scheduler::{CycleOutcome, Scheduler};
pub use services::*;
