//! Container kill fault
//!
//! Normalises the requested signal against the allow-list and hands it to a
//! [`KillExecutor`] that knows how to reach the container.

use async_trait::async_trait;
use std::sync::Arc;

use shared::normalize_signal;

use crate::error::{FaultError, FaultResult};
use crate::traits::{ContainerKiller, KillExecutor};

pub struct ContainerKillInjector {
    executor: Arc<dyn KillExecutor>,
}

impl ContainerKillInjector {
    pub fn new(executor: Arc<dyn KillExecutor>) -> Self {
        Self { executor }
    }
}

#[async_trait]
impl ContainerKiller for ContainerKillInjector {
    async fn kill_container(&self, container_id: &str, signal: &str) -> FaultResult<()> {
        let container_id = container_id.trim();
        if container_id.is_empty() {
            return Err(FaultError::InvalidContainerId);
        }

        let normalized = normalize_signal(signal).ok_or_else(|| FaultError::InvalidKillSignal {
            signal: signal.to_string(),
        })?;

        tracing::warn!(target_container = container_id, "💀 Sending {} to container", normalized);

        self.executor
            .kill(container_id, normalized)
            .await
            .map_err(|source| FaultError::ContainerKillFailed { source })
    }
}
