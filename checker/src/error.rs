//! Check error types

use std::time::Duration;
use thiserror::Error;

use shared::SharedError;

/// Result type for check operations
pub type CheckResult<T> = Result<T, CheckError>;

/// Check error types
#[derive(Error, Debug)]
pub enum CheckError {
    #[error("Unmapped process state '{statename}' for process {process}")]
    Classification { process: String, statename: String },

    #[error("Supervisor unreachable at {endpoint}: {message}")]
    ConnectionError { endpoint: String, message: String },

    #[error("Supervisor request timed out after {timeout:?}: {endpoint}")]
    Timeout { endpoint: String, timeout: Duration },

    #[error("Supervisor returned HTTP {status}: {endpoint}")]
    HttpStatus { endpoint: String, status: u16 },

    #[error("Supervisor fault {code}: {message}")]
    RemoteFault { code: i64, message: String },

    #[error("Malformed XML-RPC payload: {message}")]
    ProtocolError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Metrics sink error: {message}")]
    SinkError { message: String },

    #[error("Shared component error: {0}")]
    SharedError(#[from] SharedError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl CheckError {
    pub fn protocol(message: impl Into<String>) -> Self {
        CheckError::ProtocolError {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        CheckError::ConfigError {
            message: message.into(),
        }
    }

    pub fn sink(message: impl Into<String>) -> Self {
        CheckError::SinkError {
            message: message.into(),
        }
    }

    /// Failures reported by, or on the way to, the supervisor
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            CheckError::ConnectionError { .. }
                | CheckError::Timeout { .. }
                | CheckError::HttpStatus { .. }
                | CheckError::RemoteFault { .. }
                | CheckError::ProtocolError { .. }
        )
    }
}
