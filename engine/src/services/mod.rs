//! Service implementations
//!
//! Real implementations of the collaborator traits: the docker CLI runtime,
//! the container killer, and the platform network-latency injectors.

pub mod container_kill;
pub mod docker;
pub mod network_latency;

pub use container_kill::ContainerKillInjector;
pub use docker::{ContainerSummary, DockerCli};
#[cfg(target_os = "linux")]
pub use network_latency::NetworkLatencyInjector;
pub use network_latency::{platform_latency_injector, UnsupportedLatencyInjector};
