//! Instance configuration and connector settings
//!
//! A config file lists one or more monitored supervisord servers under
//! `instances`, in the same shape the monitoring agent uses:
//!
//! ```yaml
//! instances:
//!   - name: web
//!     host: localhost
//!     port: 9001
//!     user: monitor
//!     pass: secret
//!     proc_names: [nginx, gunicorn]
//! ```

use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Deserializer};

use shared::{SharedError, SharedResult};
use crate::error::{CheckError, CheckResult};

pub const DEFAULT_SERVER_NAME: &str = "server";
pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 9001;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Top-level config file contents
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CheckConfig {
    /// Agent-wide settings; accepted but unused
    #[serde(default)]
    pub init_config: Option<serde_yaml::Value>,

    pub instances: Vec<InstanceConfig>,
}

impl CheckConfig {
    /// Load and validate a YAML config file
    pub fn from_path(path: impl AsRef<Path>) -> CheckResult<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&contents)
    }

    /// Parse and validate YAML config text
    pub fn from_yaml_str(contents: &str) -> CheckResult<Self> {
        let config: CheckConfig = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> CheckResult<()> {
        if self.instances.is_empty() {
            return Err(CheckError::config("no instances configured"));
        }
        for instance in &self.instances {
            instance.validate()?;
        }
        Ok(())
    }
}

/// Settings for one monitored supervisord server
#[derive(Clone, PartialEq, Deserialize)]
pub struct InstanceConfig {
    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port", deserialize_with = "deserialize_port")]
    pub port: u16,

    #[serde(default)]
    pub user: Option<String>,

    #[serde(default)]
    pub pass: Option<String>,

    /// Processes to check each cycle, in emission order
    #[serde(default)]
    pub proc_names: Vec<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl InstanceConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_proc_names<I, S>(mut self, proc_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.proc_names = proc_names.into_iter().map(Into::into).collect();
        self
    }

    pub fn validate(&self) -> CheckResult<()> {
        if self.name.trim().is_empty() {
            return Err(CheckError::config("instance name must not be empty"));
        }
        if self.host.trim().is_empty() {
            return Err(CheckError::config(format!(
                "instance '{}' has an empty host",
                self.name
            )));
        }
        if self.timeout == 0 {
            return Err(CheckError::config(format!(
                "instance '{}' timeout must be at least one second",
                self.name
            )));
        }
        Ok(())
    }

    /// Credentials are used only when both user and pass are non-empty
    pub fn credentials(&self) -> Option<Credentials> {
        match (self.user.as_deref(), self.pass.as_deref()) {
            (Some(user), Some(pass)) if !user.is_empty() && !pass.is_empty() => {
                Some(Credentials::new(user, pass))
            }
            _ => None,
        }
    }

    /// True when exactly one of user/pass is set, which falls back to anonymous access
    pub fn has_partial_credentials(&self) -> bool {
        let user = self.user.as_deref().is_some_and(|u| !u.is_empty());
        let pass = self.pass.as_deref().is_some_and(|p| !p.is_empty());
        user != pass
    }

    pub fn connection(&self) -> ConnectionConfig {
        ConnectionConfig {
            host: self.host.clone(),
            port: self.port,
            credentials: self.credentials(),
            timeout: Duration::from_secs(self.timeout),
        }
    }
}

impl Default for InstanceConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            host: default_host(),
            port: DEFAULT_PORT,
            user: None,
            pass: None,
            proc_names: Vec::new(),
            timeout: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl fmt::Debug for InstanceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceConfig")
            .field("name", &self.name)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("pass", &self.pass.as_ref().map(|_| "***"))
            .field("proc_names", &self.proc_names)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Username and password for HTTP basic auth against supervisord
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user: String,
    pub pass: String,
}

impl Credentials {
    pub fn new(user: impl Into<String>, pass: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            pass: pass.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("pass", &"***")
            .finish()
    }
}

/// Structured connector settings; credentials never end up in the URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub host: String,
    pub port: u16,
    pub credentials: Option<Credentials>,
    pub timeout: Duration,
}

impl ConnectionConfig {
    /// XML-RPC endpoint of the supervisord HTTP server
    pub fn endpoint(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("http://[{}]:{}/RPC2", self.host, self.port)
        } else {
            format!("http://{}:{}/RPC2", self.host, self.port)
        }
    }
}

/// Port as written in config: a YAML integer or a string holding one
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum PortValue {
    Number(i64),
    Text(String),
}

/// Convert a configured port to its canonical `u16` form (1..=65535)
pub fn parse_port(value: &PortValue) -> SharedResult<u16> {
    let invalid = |raw: String| SharedError::InvalidConfig {
        field: "port".to_string(),
        value: raw,
    };

    let number = match value {
        PortValue::Number(n) => *n,
        PortValue::Text(s) => s.trim().parse::<i64>().map_err(|_| invalid(s.clone()))?,
    };

    match u16::try_from(number) {
        Ok(port) if port != 0 => Ok(port),
        _ => Err(invalid(number.to_string())),
    }
}

fn deserialize_port<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    let value = PortValue::deserialize(deserializer)?;
    parse_port(&value).map_err(serde::de::Error::custom)
}

fn default_name() -> String {
    DEFAULT_SERVER_NAME.to_string()
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
