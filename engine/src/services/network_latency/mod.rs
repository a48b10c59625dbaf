//! Network-latency fault injection
//!
//! Two implementations share the [`FaultInjector`] contract: the nsenter/tc
//! injector on Linux and [`UnsupportedLatencyInjector`] everywhere else.
//! [`platform_latency_injector`] picks one for the current host.

#[cfg(target_os = "linux")]
mod linux;
mod unsupported;

#[cfg(target_os = "linux")]
pub use linux::{NetworkLatencyInjector, DEFAULT_COMMAND_TIMEOUT};
pub use unsupported::UnsupportedLatencyInjector;

use std::sync::Arc;

use crate::traits::{FaultInjector, PidResolver};

/// The latency injector this host can actually run
pub fn platform_latency_injector(pid_resolver: Arc<dyn PidResolver>) -> Arc<dyn FaultInjector> {
    #[cfg(target_os = "linux")]
    {
        Arc::new(NetworkLatencyInjector::new(pid_resolver))
    }

    #[cfg(not(target_os = "linux"))]
    {
        let _ = pid_resolver;
        tracing::warn!("⚠️ network-latency faults are only supported on Linux hosts");
        Arc::new(UnsupportedLatencyInjector)
    }
}
