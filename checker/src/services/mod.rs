//! Check services implementations

pub mod xmlrpc;
pub mod supervisor_client;
pub mod log_sink;
pub mod json_sink;
pub mod dogstatsd_sink;

#[cfg(test)]
pub mod tests;

pub use supervisor_client::*;
pub use log_sink::*;
pub use json_sink::*;
pub use dogstatsd_sink::*;
