//! Panic button
//!
//! Best-effort rollback: revert latency and restart every target, collecting
//! failures instead of stopping at the first one, then forget the tracked
//! targets. Clearing happens even when every step failed; the sweep was
//! attempted and the registry only ever promised "might need rollback".

use std::collections::HashSet;
use std::sync::Arc;

use super::registry::TargetRegistry;
use crate::error::{AggregateError, RollbackError};
use crate::traits::{ContainerRestarter, FaultInjector};

#[derive(Default, Clone)]
pub struct PanicButton {
    injector: Option<Arc<dyn FaultInjector>>,
    restarter: Option<Arc<dyn ContainerRestarter>>,
    registry: Option<Arc<TargetRegistry>>,
}

impl PanicButton {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the latency injector used for reverts (fluent API)
    pub fn with_injector(mut self, injector: Arc<dyn FaultInjector>) -> Self {
        self.injector = Some(injector);
        self
    }

    /// Configure the container restarter (fluent API)
    pub fn with_restarter(mut self, restarter: Arc<dyn ContainerRestarter>) -> Self {
        self.restarter = Some(restarter);
        self
    }

    /// Configure the registry used when no targets are given (fluent API)
    pub fn with_registry(mut self, registry: Arc<TargetRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Roll back everything the registry knows about
    pub async fn trigger_all(&self) -> Result<(), AggregateError<RollbackError>> {
        self.trigger(&[]).await
    }

    /// Roll back `container_ids`, or the registry contents when none are given
    pub async fn trigger(&self, container_ids: &[String]) -> Result<(), AggregateError<RollbackError>> {
        let mut targets = normalize_targets(container_ids);
        if targets.is_empty() {
            if let Some(registry) = &self.registry {
                targets = registry.snapshot();
            }
        }

        tracing::warn!("🚨 Panic rollback for {} targets: {:?}", targets.len(), targets);

        let mut errors = Vec::new();
        for container_id in &targets {
            if let Some(injector) = &self.injector {
                if let Err(source) = injector.revert_network_latency(container_id).await {
                    tracing::error!(target_container = %container_id, "❌ Latency revert failed: {}", source);
                    errors.push(RollbackError::Revert {
                        container_id: container_id.clone(),
                        source,
                    });
                }
            }

            if let Some(restarter) = &self.restarter {
                match restarter.restart(container_id).await {
                    Ok(()) => tracing::info!(target_container = %container_id, "🔄 Restarted"),
                    Err(source) => {
                        tracing::error!(target_container = %container_id, "❌ Restart failed: {}", source);
                        errors.push(RollbackError::Restart {
                            container_id: container_id.clone(),
                            source,
                        });
                    }
                }
            }
        }

        if let Some(registry) = &self.registry {
            registry.reset();
        }

        AggregateError::check(errors)
    }
}

/// Trim, drop blanks and dedupe, keeping first-seen order
fn normalize_targets(raw: &[String]) -> Vec<String> {
    let mut seen = HashSet::with_capacity(raw.len());
    raw.iter()
        .map(|id| id.trim())
        .filter(|id| !id.is_empty() && seen.insert(*id))
        .map(str::to_string)
        .collect()
}
