//! Target registry
//!
//! Remembers which containers may carry an injected fault so the panic
//! button can roll back without replaying configuration. Membership only
//! says a fault *may* exist, never which one.

use std::collections::BTreeSet;
use std::sync::{PoisonError, RwLock};

use crate::traits::TargetTracker;

/// Concurrency-safe, deduplicating set of container identifiers
#[derive(Debug, Default)]
pub struct TargetRegistry {
    targets: RwLock<BTreeSet<String>>,
}

impl TargetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a container; blank ids are ignored and repeats are no-ops
    pub fn mark(&self, container_id: &str) {
        let id = container_id.trim();
        if id.is_empty() {
            return;
        }

        let mut targets = self.targets.write().unwrap_or_else(PoisonError::into_inner);
        if targets.insert(id.to_string()) {
            tracing::debug!(target_container = id, "🎯 Tracking fault target");
        }
    }

    /// Sorted copy of the current members
    pub fn snapshot(&self) -> Vec<String> {
        let targets = self.targets.read().unwrap_or_else(PoisonError::into_inner);
        targets.iter().cloned().collect()
    }

    /// Forget every tracked target
    pub fn reset(&self) {
        let mut targets = self.targets.write().unwrap_or_else(PoisonError::into_inner);
        targets.clear();
    }

    pub fn len(&self) -> usize {
        self.targets.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TargetTracker for TargetRegistry {
    fn mark(&self, container_id: &str) {
        TargetRegistry::mark(self, container_id);
    }
}
