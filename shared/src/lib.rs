//! Shared types for the chaos-dock fault injection engine
//!
//! Holds the experiment configuration model and its YAML loader, the kill
//! signal allow-list, and tracing setup. Nothing here touches containers.

pub mod config;
pub mod errors;
pub mod logging;
pub mod signal;

pub use config::{
    format_duration, load_chaos_config, parse_duration, ChaosConfig, Experiment, Fault, FaultKind,
    Schedule,
};
pub use errors::*;
pub use signal::{normalize_signal, DEFAULT_KILL_SIGNAL, SUPPORTED_SIGNALS};
