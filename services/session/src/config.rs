//! Session configuration.
//!
//! TOML-based with full defaults, so the bridge runs against a local gateway
//! with no config file at all.

use anyhow::{Context, Result};
use cgate_network::{Backoff, ParsePolicy};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Status channel endpoint.
    pub status_addr: String,

    /// Command channel endpoint.
    pub command_addr: String,

    /// Bus network whose lighting levels get polled.
    pub network: u16,

    /// Seconds after connect before the level poll goes out.
    pub poll_delay_secs: u64,

    /// Seconds the response window stays open for level reports.
    pub poll_window_secs: u64,

    /// Base backoff delay between reconnect attempts.
    pub base_backoff_ms: u64,

    /// Maximum backoff delay between reconnect attempts.
    pub max_backoff_ms: u64,

    /// Tear the status channel down on unparseable lines instead of
    /// dropping them.
    pub strict_parse: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            status_addr: "localhost:20025".to_string(),
            command_addr: "localhost:20023".to_string(),
            network: 254,
            poll_delay_secs: 5,
            poll_window_secs: 20,
            base_backoff_ms: 2000,
            max_backoff_ms: 30000,
            strict_parse: false,
        }
    }
}

impl SessionConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn parse_policy(&self) -> ParsePolicy {
        if self.strict_parse {
            ParsePolicy::Strict
        } else {
            ParsePolicy::Lenient
        }
    }

    pub fn backoff(&self) -> Backoff {
        Backoff::new(
            Duration::from_millis(self.base_backoff_ms),
            Duration::from_millis(self.max_backoff_ms),
        )
    }

    pub fn poll_delay(&self) -> Duration {
        Duration::from_secs(self.poll_delay_secs)
    }

    pub fn poll_window(&self) -> Duration {
        Duration::from_secs(self.poll_window_secs)
    }
}
