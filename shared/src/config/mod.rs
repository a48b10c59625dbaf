//! Experiment configuration model
//!
//! Mirrors the YAML experiment file. The types are deliberately loose
//! (strings for fault types and durations) so the engine can report a
//! precise error for each malformed experiment instead of refusing the
//! whole file at parse time.

pub mod loader;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::errors::{SharedError, SharedResult};

pub use loader::{load_chaos_config, validate, write_default_config, DEFAULT_CHAOS_YAML};

/// Root of the experiment file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChaosConfig {
    #[serde(default)]
    pub experiments: Vec<Experiment>,
}

/// A single declarative fault experiment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experiment {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub target_container: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub fault: Fault,
    #[serde(default)]
    pub schedule: Schedule,
}

/// Fault descriptor, discriminated by `type`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fault {
    #[serde(rename = "type", default)]
    pub fault_type: String,

    /// Delay for `network-latency`, e.g. `500ms`
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub delay: String,

    /// Signal for `kill`; blank means SIGKILL
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub signal: String,
}

impl Fault {
    pub fn kind(&self) -> Option<FaultKind> {
        FaultKind::parse(&self.fault_type)
    }
}

/// Cadence for the scheduler
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    #[serde(default)]
    pub every: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub jitter: String,
}

/// Supported fault types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultKind {
    NetworkLatency,
    Kill,
}

impl FaultKind {
    pub const NETWORK_LATENCY: &'static str = "network-latency";
    pub const KILL: &'static str = "kill";

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            Self::NETWORK_LATENCY => Some(Self::NetworkLatency),
            Self::KILL => Some(Self::Kill),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NetworkLatency => Self::NETWORK_LATENCY,
            Self::Kill => Self::KILL,
        }
    }
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse a duration string such as `500ms`, `60s` or `1m 30s`
pub fn parse_duration(input: &str) -> SharedResult<Duration> {
    humantime::parse_duration(input.trim()).map_err(|source| SharedError::InvalidDuration {
        input: input.to_string(),
        source,
    })
}

/// Render a duration the same way it would be written in the config file
pub fn format_duration(duration: Duration) -> String {
    humantime::format_duration(duration).to_string()
}
