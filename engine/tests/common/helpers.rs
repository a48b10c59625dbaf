//! Test helpers and builder patterns for engine tests
//!
//! [`EngineBuilder`] wires mock collaborators into a runner and panic button
//! sharing one registry, the same way the binary wires the real services.

use std::sync::{Arc, Mutex};

use engine::services::ContainerKillInjector;
use engine::traits::{
    ContainerKiller, MockContainerRestarter, MockFaultInjector, MockKillExecutor,
};
use engine::{PanicButton, Runner, TargetRegistry};

/// Records calls made against a mock, in order
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn record(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

/// Builder for a runner/panic button pair with permissive default mocks
pub struct EngineBuilder {
    injector: MockFaultInjector,
    kill_executor: MockKillExecutor,
    restarter: MockContainerRestarter,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self {
            injector: MockFaultInjector::new(),
            kill_executor: MockKillExecutor::new(),
            restarter: MockContainerRestarter::new(),
        }
    }

    /// Configure the latency injector mock with a setup function
    pub fn with_injector<F>(mut self, setup: F) -> Self
    where
        F: FnOnce(&mut MockFaultInjector),
    {
        setup(&mut self.injector);
        self
    }

    /// Configure the runtime kill mock behind the real kill injector
    pub fn with_kill_executor<F>(mut self, setup: F) -> Self
    where
        F: FnOnce(&mut MockKillExecutor),
    {
        setup(&mut self.kill_executor);
        self
    }

    /// Configure the restarter mock with a setup function
    pub fn with_restarter<F>(mut self, setup: F) -> Self
    where
        F: FnOnce(&mut MockContainerRestarter),
    {
        setup(&mut self.restarter);
        self
    }

    pub fn build(self) -> TestEngine {
        let registry = Arc::new(TargetRegistry::new());
        let injector = Arc::new(self.injector);
        let killer: Arc<dyn ContainerKiller> =
            Arc::new(ContainerKillInjector::new(Arc::new(self.kill_executor)));

        let runner = Runner::new()
            .with_injector(injector.clone())
            .with_killer(killer)
            .with_tracker(registry.clone());

        let panic_button = PanicButton::new()
            .with_injector(injector)
            .with_restarter(Arc::new(self.restarter))
            .with_registry(registry.clone());

        TestEngine {
            runner,
            panic_button,
            registry,
        }
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub struct TestEngine {
    pub runner: Runner,
    pub panic_button: PanicButton,
    pub registry: Arc<TargetRegistry>,
}
