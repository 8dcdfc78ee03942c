//! Check core logic: pure functions with no I/O

pub mod classifier;
pub mod evaluation;
pub mod message;
pub mod uptime;

pub use classifier::{classify, classify_process, health_for};
pub use evaluation::{evaluate, process_tags, server_tags};
pub use message::{build_message, format_epoch};
pub use uptime::uptime;
