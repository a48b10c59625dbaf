//! Trait definitions with mockall annotations for testing
//!
//! Every collaborator the engine talks to sits behind one of these traits so
//! components receive their dependencies at construction time and tests can
//! swap in the generated `Mock*` types.

use std::time::Duration;

use crate::error::{FaultResult, RuntimeResult};

/// Applies and removes network-latency faults
#[mockall::automock]
#[async_trait::async_trait]
pub trait FaultInjector: Send + Sync {
    /// Add `delay` to all egress traffic of the container
    async fn inject_network_latency(&self, container_id: &str, delay: Duration) -> FaultResult<()>;

    /// Remove any latency fault; succeeds when none is present
    async fn revert_network_latency(&self, container_id: &str) -> FaultResult<()>;
}

/// Terminates container processes
#[mockall::automock]
#[async_trait::async_trait]
pub trait ContainerKiller: Send + Sync {
    /// Send `signal` (blank for SIGKILL) to the container
    async fn kill_container(&self, container_id: &str, signal: &str) -> FaultResult<()>;
}

/// Maps a container to the host pid of its init process
#[mockall::automock]
#[async_trait::async_trait]
pub trait PidResolver: Send + Sync {
    /// Fails when the container is not running or reports an invalid pid
    async fn container_pid(&self, container_id: &str) -> RuntimeResult<u32>;
}

/// Delivers an already normalised signal to a container
#[mockall::automock]
#[async_trait::async_trait]
pub trait KillExecutor: Send + Sync {
    async fn kill(&self, container_id: &str, signal: &str) -> RuntimeResult<()>;
}

/// Restarts containers during rollback
#[mockall::automock]
#[async_trait::async_trait]
pub trait ContainerRestarter: Send + Sync {
    async fn restart(&self, container_id: &str) -> RuntimeResult<()>;
}

/// Records containers that received a fault
#[mockall::automock]
pub trait TargetTracker: Send + Sync {
    fn mark(&self, container_id: &str);
}
