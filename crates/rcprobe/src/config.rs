//! Session and wait configuration.
//!
//! Everything has a default matching a local remote-control server driving
//! Firefox against the demo application. A YAML file may override any
//! subset of fields:
//!
//! ```yaml
//! remote:
//!   host: localhost
//!   port: 4444
//!   browser: "*firefox /usr/bin/firefox"
//!   base_url: http://127.0.0.1:10080/rap
//!   command_timeout_ms: 30000
//! wait:
//!   poll_interval_ms: 1000
//!   max_attempts: 60
//!   settle_ms: 1000
//! click_command: qxClickAt
//! ```

use crate::protocol::{self, DEFAULT_CLICK_COMMAND};
use crate::result::{ProbeError, ProbeResult};
use crate::retry::{RetryPolicy, DEFAULT_MAX_ATTEMPTS, DEFAULT_POLL_INTERVAL};
use crate::scenario::ButtonScenario;
use crate::wait::DEFAULT_SETTLE_DELAY;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default remote-control server host
pub const DEFAULT_HOST: &str = "localhost";
/// Default remote-control server port
pub const DEFAULT_PORT: u16 = 4444;
/// Default browser start command
pub const DEFAULT_BROWSER: &str = "*firefox";
/// Default URL of the application under test
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:10080/rap";
/// Default limit on one command exchange, in milliseconds
pub const DEFAULT_COMMAND_TIMEOUT_MS: u64 = 30_000;

/// Where the remote-control server lives and what it should launch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Browser start command, e.g. `*firefox /usr/bin/firefox`
    pub browser: String,
    /// Base URL of the application under test
    pub base_url: String,
    /// Limit on one command exchange in milliseconds
    pub command_timeout_ms: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            browser: DEFAULT_BROWSER.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            command_timeout_ms: DEFAULT_COMMAND_TIMEOUT_MS,
        }
    }
}

impl RemoteConfig {
    /// Command endpoint of the configured server
    #[must_use]
    pub fn driver_url(&self) -> String {
        protocol::driver_url(&self.host, self.port)
    }

    /// Limit on one command exchange
    #[must_use]
    pub const fn command_timeout(&self) -> Duration {
        Duration::from_millis(self.command_timeout_ms)
    }
}

/// Poll and settle timing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaitConfig {
    /// Pause between poll attempts in milliseconds
    pub poll_interval_ms: u64,
    /// Attempts before a poll gives up
    pub max_attempts: usize,
    /// Wall-clock budget in milliseconds; replaces `max_attempts` when set
    pub deadline_ms: Option<u64>,
    /// Fixed pause after a click in milliseconds
    pub settle_ms: u64,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: u64::try_from(DEFAULT_POLL_INTERVAL.as_millis()).unwrap_or(1_000),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            deadline_ms: None,
            settle_ms: u64::try_from(DEFAULT_SETTLE_DELAY.as_millis()).unwrap_or(1_000),
        }
    }
}

impl WaitConfig {
    /// Build the retry policy these settings describe
    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        let policy =
            RetryPolicy::default().with_interval(Duration::from_millis(self.poll_interval_ms));
        match self.deadline_ms {
            Some(ms) => policy.with_deadline(Duration::from_millis(ms)),
            None => policy.with_max_attempts(self.max_attempts),
        }
    }

    /// Fixed settle delay
    #[must_use]
    pub const fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}

/// Complete configuration for a driver and the button scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Remote-control server
    pub remote: RemoteConfig,
    /// Timing
    pub wait: WaitConfig,
    /// Command name issued for clicks
    pub click_command: String,
    /// Scenario to run
    pub scenario: ButtonScenario,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            remote: RemoteConfig::default(),
            wait: WaitConfig::default(),
            click_command: DEFAULT_CLICK_COMMAND.to_string(),
            scenario: ButtonScenario::default(),
        }
    }
}

impl ProbeConfig {
    /// Create the default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a YAML document; missing fields take their defaults
    pub fn from_yaml_str(yaml: &str) -> ProbeResult<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> ProbeResult<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        tracing::debug!(path = %path.as_ref().display(), "loaded config file");
        Self::from_yaml_str(&contents)
    }

    /// Render as YAML
    pub fn to_yaml(&self) -> ProbeResult<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Reject settings no session could run with
    pub fn validate(&self) -> ProbeResult<()> {
        if self.remote.host.trim().is_empty() {
            return Err(ProbeError::config("remote.host must not be empty"));
        }
        if self.remote.port == 0 {
            return Err(ProbeError::config("remote.port must be non-zero"));
        }
        if self.remote.browser.trim().is_empty() {
            return Err(ProbeError::config("remote.browser must not be empty"));
        }
        if self.remote.base_url.trim().is_empty() {
            return Err(ProbeError::config("remote.base_url must not be empty"));
        }
        if self.remote.command_timeout_ms == 0 {
            return Err(ProbeError::config(
                "remote.command_timeout_ms must be at least 1",
            ));
        }
        if self.wait.deadline_ms.is_none() && self.wait.max_attempts == 0 {
            return Err(ProbeError::config("wait.max_attempts must be at least 1"));
        }
        if self.click_command.trim().is_empty() {
            return Err(ProbeError::config("click_command must not be empty"));
        }
        if self.scenario.element.name().is_empty() {
            return Err(ProbeError::config("scenario.element must not be empty"));
        }
        Ok(())
    }
}
