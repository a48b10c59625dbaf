//! Latency injector for hosts without network namespaces

use async_trait::async_trait;
use std::time::Duration;

use crate::error::{FaultError, FaultResult};
use crate::traits::FaultInjector;

/// Refuses every request; netns and tc manipulation only exist on Linux
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedLatencyInjector;

#[async_trait]
impl FaultInjector for UnsupportedLatencyInjector {
    async fn inject_network_latency(&self, _container_id: &str, _delay: Duration) -> FaultResult<()> {
        Err(FaultError::UnsupportedPlatform)
    }

    async fn revert_network_latency(&self, _container_id: &str) -> FaultResult<()> {
        Err(FaultError::UnsupportedPlatform)
    }
}
