//! Core engine logic
//!
//! Experiment execution, scheduling, target tracking and rollback. Nothing in
//! here performs I/O directly; it only talks to the collaborators in
//! [`crate::traits`].

pub mod executor;
pub mod panic_button;
pub mod registry;
pub mod scheduler;

pub use executor::{ExperimentResult, Runner};
pub use panic_button::PanicButton;
pub use registry::TargetRegistry;
pub use scheduler::{next_interval, parse_schedule, ScheduledExperiment};
