//! Container fault injection engine
//!
//! Runs chaos experiments against Docker containers: network latency through
//! the container's network namespace and signal-based kills, either once or
//! on a jittered schedule. Every container that received a fault is tracked
//! so the panic button can revert latency and restart it afterwards.
//!
//! Core logic in [`core`] only talks to the traits in [`traits`]; the real
//! implementations live in [`services`].

pub mod core;
pub mod error;
pub mod services;
pub mod traits;

// Re-export commonly used types
pub use core::{ExperimentResult, PanicButton, Runner, TargetRegistry};
pub use error::{
    AggregateError, ExecutionError, FaultError, FaultResult, RollbackError, RuntimeError,
    RuntimeResult, SchedulerError,
};
pub use traits::{
    ContainerKiller, ContainerRestarter, FaultInjector, KillExecutor, PidResolver, TargetTracker,
};
