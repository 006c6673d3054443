//! Probe and analysis configuration.
//!
//! `ProbeConfig` carries the expectations the analyzer checks against and
//! the bounds every connectivity probe runs under. It never holds the
//! connection string itself: that is loaded once by the caller and passed
//! explicitly.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Scheme expected for managed (Atlas style) deployments.
pub const DEFAULT_EXPECTED_SCHEME: &str = "mongodb+srv";

/// Domain suffix expected for managed cluster hosts.
pub const DEFAULT_EXPECTED_HOST_SUFFIX: &str = ".mongodb.net";

/// Default per-probe timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

/// Upper bound accepted for the per-probe timeout.
pub const MAX_TIMEOUT: Duration = Duration::from_millis(300_000);

/// Which occurrence of `@` separates credentials from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AtSplit {
    /// Split on the first `@`; a raw `@` in the password leaks into the host.
    First,
    /// Split on the last `@`; a raw `@` in the password stays in the credentials.
    #[default]
    Last,
}

/// Operation run against a freshly opened connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProbeOperation {
    /// `{ ping: 1 }` against the `admin` database
    Ping,
    /// `listDatabases`, which also exercises authorization
    #[default]
    ListDatabases,
}

impl std::fmt::Display for ProbeOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ping => write!(f, "ping"),
            Self::ListDatabases => write!(f, "listDatabases"),
        }
    }
}

/// Configuration for analysis and probing.
///
/// # Example
/// ```rust
/// use connprobe_core::config::ProbeConfig;
/// use std::time::Duration;
///
/// let config = ProbeConfig::new()
///     .with_timeout(Duration::from_millis(2000))
///     .with_alternate_host("cluster0-shard-00-00.abcde.mongodb.net".to_string());
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Scheme the connection string is expected to use
    pub expected_scheme: String,
    /// Domain suffix every host is expected to end with
    pub expected_host_suffix: String,
    /// Upper bound for a single probe, connection setup included
    pub timeout: Duration,
    /// Operation run after connecting
    pub operation: ProbeOperation,
    /// Host literal substituted by the `alternate-host` variant
    pub alternate_host: Option<String>,
    /// Credential/host split strategy used by the parser
    pub at_split: AtSplit,
    /// Application name reported to the server
    pub app_name: String,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            expected_scheme: DEFAULT_EXPECTED_SCHEME.to_string(),
            expected_host_suffix: DEFAULT_EXPECTED_HOST_SUFFIX.to_string(),
            timeout: DEFAULT_TIMEOUT,
            operation: ProbeOperation::default(),
            alternate_host: None,
            at_split: AtSplit::default(),
            app_name: format!("connprobe-{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ProbeConfig {
    /// Creates a config with managed-cluster defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates configuration values.
    ///
    /// # Errors
    /// Returns error if the timeout is zero or above [`MAX_TIMEOUT`], or if
    /// the expected scheme is empty.
    pub fn validate(&self) -> crate::Result<()> {
        if self.expected_scheme.is_empty() {
            return Err(crate::error::ConnProbeError::configuration(
                "expected_scheme cannot be empty",
            ));
        }

        if self.timeout.is_zero() {
            return Err(crate::error::ConnProbeError::configuration(
                "timeout must be greater than 0",
            ));
        }

        if self.timeout > MAX_TIMEOUT {
            return Err(crate::error::ConnProbeError::configuration(format!(
                "timeout must not exceed {} ms",
                MAX_TIMEOUT.as_millis()
            )));
        }

        if self
            .alternate_host
            .as_deref()
            .is_some_and(|host| host.trim().is_empty())
        {
            return Err(crate::error::ConnProbeError::configuration(
                "alternate_host cannot be blank",
            ));
        }

        Ok(())
    }

    /// Builder method to set the expected scheme.
    pub fn with_expected_scheme(mut self, scheme: String) -> Self {
        self.expected_scheme = scheme;
        self
    }

    /// Builder method to set the expected host suffix.
    pub fn with_expected_host_suffix(mut self, suffix: String) -> Self {
        self.expected_host_suffix = suffix;
        self
    }

    /// Builder method to set the probe timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builder method to set the probe operation.
    pub fn with_operation(mut self, operation: ProbeOperation) -> Self {
        self.operation = operation;
        self
    }

    /// Builder method to set the alternate host literal.
    pub fn with_alternate_host(mut self, host: String) -> Self {
        self.alternate_host = Some(host);
        self
    }

    /// Builder method to set the split strategy.
    pub fn with_at_split(mut self, at_split: AtSplit) -> Self {
        self.at_split = at_split;
        self
    }
}
