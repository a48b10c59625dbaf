//! Experiment executor
//!
//! Validates one experiment, dispatches it to the latency injector or the
//! container killer, and reports the outcome as an [`ExperimentResult`].
//! Execution never fails outright: every problem ends up in the result so a
//! caller can judge each experiment on its own.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;

use shared::{format_duration, parse_duration, ChaosConfig, Experiment, FaultKind, DEFAULT_KILL_SIGNAL};

use crate::error::{ExecutionError, FaultResult};
use crate::traits::{ContainerKiller, FaultInjector, TargetTracker};

/// Outcome of a single execution attempt
#[derive(Debug)]
pub struct ExperimentResult {
    pub name: String,
    pub target_container: String,
    pub fault_type: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub skipped: bool,
    pub message: String,
    pub error: Option<ExecutionError>,
}

impl ExperimentResult {
    /// Wall time spent, clamped to zero if the clock went backwards
    pub fn duration(&self) -> Duration {
        (self.finished_at - self.started_at)
            .to_std()
            .unwrap_or(Duration::ZERO)
    }

    pub fn is_success(&self) -> bool {
        !self.skipped && self.error.is_none()
    }
}

enum Outcome {
    Skipped,
    Applied(String),
}

/// Runs experiments against the configured collaborators
#[derive(Default, Clone)]
pub struct Runner {
    injector: Option<Arc<dyn FaultInjector>>,
    killer: Option<Arc<dyn ContainerKiller>>,
    tracker: Option<Arc<dyn TargetTracker>>,
}

impl Runner {
    /// Create a runner with no collaborators configured
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the latency injector (fluent API)
    pub fn with_injector(mut self, injector: Arc<dyn FaultInjector>) -> Self {
        self.injector = Some(injector);
        self
    }

    /// Configure the container killer (fluent API)
    pub fn with_killer(mut self, killer: Arc<dyn ContainerKiller>) -> Self {
        self.killer = Some(killer);
        self
    }

    /// Configure where successful faults are recorded (fluent API)
    pub fn with_tracker(mut self, tracker: Arc<dyn TargetTracker>) -> Self {
        self.tracker = Some(tracker);
        self
    }

    /// Apply latency directly, bypassing experiment validation
    pub async fn apply_network_latency(&self, container_id: &str, delay: Duration) -> Result<(), ExecutionError> {
        let injector = self.injector.as_ref().ok_or(ExecutionError::InjectorNotConfigured)?;
        injector
            .inject_network_latency(container_id, delay)
            .await
            .map_err(ExecutionError::Inject)
    }

    /// Execute one experiment and describe what happened
    pub async fn execute_experiment(&self, experiment: &Experiment) -> ExperimentResult {
        let started_at = Utc::now();
        let outcome = self.apply(experiment).await;
        let finished_at = Utc::now();

        let mut result = ExperimentResult {
            name: experiment.name.clone(),
            target_container: experiment.target_container.clone(),
            fault_type: experiment.fault.fault_type.clone(),
            started_at,
            finished_at,
            skipped: false,
            message: String::new(),
            error: None,
        };

        match outcome {
            Ok(Outcome::Skipped) => {
                result.skipped = true;
                result.message = "experiment is disabled".to_string();
            }
            Ok(Outcome::Applied(message)) => result.message = message,
            Err(err) => result.error = Some(err),
        }

        result
    }

    /// Execute every experiment once, in config order
    pub async fn run_once(&self, config: &ChaosConfig) -> Vec<ExperimentResult> {
        let mut results = Vec::with_capacity(config.experiments.len());
        for experiment in &config.experiments {
            results.push(self.execute_experiment(experiment).await);
        }
        results
    }

    async fn apply(&self, experiment: &Experiment) -> Result<Outcome, ExecutionError> {
        if !experiment.enabled {
            return Ok(Outcome::Skipped);
        }

        let target = experiment.target_container.trim();
        if target.is_empty() {
            return Err(ExecutionError::MissingTarget);
        }

        let message = match experiment.fault.kind() {
            Some(FaultKind::NetworkLatency) => {
                let injector = self.injector.as_ref().ok_or(ExecutionError::InjectorNotConfigured)?;

                let delay = parse_duration(&experiment.fault.delay).map_err(|source| {
                    ExecutionError::InvalidDelay {
                        delay: experiment.fault.delay.clone(),
                        source,
                    }
                })?;

                log_fault(
                    &experiment.name,
                    target,
                    injector.inject_network_latency(target, delay).await,
                )
                .map_err(ExecutionError::Inject)?;

                format!("applied {} network delay to {}", format_duration(delay), target)
            }
            Some(FaultKind::Kill) => {
                let killer = self.killer.as_ref().ok_or(ExecutionError::KillerNotConfigured)?;

                let signal = experiment.fault.signal.trim();
                log_fault(
                    &experiment.name,
                    target,
                    killer.kill_container(target, signal).await,
                )
                .map_err(ExecutionError::Kill)?;

                let shown = if signal.is_empty() { DEFAULT_KILL_SIGNAL } else { signal };
                format!("sent {shown} to {target}")
            }
            None => {
                return Err(ExecutionError::UnsupportedFaultType(
                    experiment.fault.fault_type.clone(),
                ))
            }
        };

        if let Some(tracker) = &self.tracker {
            tracker.mark(target);
        }

        Ok(Outcome::Applied(message))
    }
}

fn log_fault(experiment: &str, target: &str, outcome: FaultResult<()>) -> FaultResult<()> {
    match &outcome {
        Ok(()) => tracing::debug!(experiment, target_container = target, "💉 Fault applied"),
        Err(err) => tracing::debug!(
            experiment,
            target_container = target,
            retryable = err.is_retryable(),
            "💥 Fault application failed: {}",
            err
        ),
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TargetRegistry;
    use crate::error::FaultError;
    use crate::traits::{MockContainerKiller, MockFaultInjector};
    use shared::{Fault, Schedule};

    fn latency_experiment(target: &str, delay: &str) -> Experiment {
        Experiment {
            name: "db-latency".to_string(),
            target_container: target.to_string(),
            enabled: true,
            fault: Fault {
                fault_type: "network-latency".to_string(),
                delay: delay.to_string(),
                signal: String::new(),
            },
            schedule: Schedule {
                every: "60s".to_string(),
                jitter: String::new(),
            },
        }
    }

    fn kill_experiment(target: &str, signal: &str) -> Experiment {
        Experiment {
            name: "kill-api".to_string(),
            target_container: target.to_string(),
            enabled: true,
            fault: Fault {
                fault_type: "kill".to_string(),
                delay: String::new(),
                signal: signal.to_string(),
            },
            schedule: Schedule::default(),
        }
    }

    #[tokio::test]
    async fn test_disabled_experiment_is_skipped() {
        let mut injector = MockFaultInjector::new();
        injector.expect_inject_network_latency().times(0);
        let registry = Arc::new(TargetRegistry::new());

        let runner = Runner::new()
            .with_injector(Arc::new(injector))
            .with_tracker(registry.clone());

        let mut experiment = latency_experiment("postgres", "500ms");
        experiment.enabled = false;

        let result = runner.execute_experiment(&experiment).await;
        assert!(result.skipped);
        assert_eq!(result.message, "experiment is disabled");
        assert!(result.error.is_none());
        assert!(registry.is_empty());
        assert!(result.finished_at >= result.started_at);
    }

    #[tokio::test]
    async fn test_blank_target_is_rejected() {
        let registry = Arc::new(TargetRegistry::new());
        let runner = Runner::new()
            .with_injector(Arc::new(MockFaultInjector::new()))
            .with_tracker(registry.clone());

        let result = runner.execute_experiment(&latency_experiment("   ", "500ms")).await;
        assert!(matches!(result.error, Some(ExecutionError::MissingTarget)));
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_latency_requires_injector() {
        let result = Runner::new()
            .execute_experiment(&latency_experiment("postgres", "500ms"))
            .await;
        assert!(matches!(result.error, Some(ExecutionError::InjectorNotConfigured)));
    }

    #[tokio::test]
    async fn test_kill_requires_killer() {
        let result = Runner::new().execute_experiment(&kill_experiment("api", "")).await;
        assert!(matches!(result.error, Some(ExecutionError::KillerNotConfigured)));
    }

    #[tokio::test]
    async fn test_bad_delay_names_offending_string() {
        let mut injector = MockFaultInjector::new();
        injector.expect_inject_network_latency().times(0);
        let runner = Runner::new().with_injector(Arc::new(injector));

        let result = runner.execute_experiment(&latency_experiment("postgres", "slow")).await;
        let err = result.error.expect("delay parse should fail");
        assert!(matches!(err, ExecutionError::InvalidDelay { .. }));
        assert!(err.to_string().contains("\"slow\""));
    }

    #[tokio::test]
    async fn test_latency_success_marks_target() {
        let mut injector = MockFaultInjector::new();
        injector
            .expect_inject_network_latency()
            .withf(|id, delay| id == "postgres" && *delay == Duration::from_millis(500))
            .returning(|_, _| Ok(()))
            .times(1);
        let registry = Arc::new(TargetRegistry::new());

        let runner = Runner::new()
            .with_injector(Arc::new(injector))
            .with_tracker(registry.clone());

        let result = runner.execute_experiment(&latency_experiment(" postgres ", "500ms")).await;
        assert!(result.is_success(), "unexpected error: {:?}", result.error);
        assert_eq!(result.message, "applied 500ms network delay to postgres");
        assert_eq!(registry.snapshot(), vec!["postgres"]);
    }

    #[tokio::test]
    async fn test_injector_failure_leaves_registry_untouched() {
        let mut injector = MockFaultInjector::new();
        injector
            .expect_inject_network_latency()
            .returning(|_, _| Err(FaultError::InsufficientPrivileges {
                stderr: "Operation not permitted".to_string(),
            }));
        let registry = Arc::new(TargetRegistry::new());

        let runner = Runner::new()
            .with_injector(Arc::new(injector))
            .with_tracker(registry.clone());

        let result = runner.execute_experiment(&latency_experiment("postgres", "500ms")).await;
        let err = result.error.expect("injection should fail");
        assert!(matches!(
            err.fault_error(),
            Some(FaultError::InsufficientPrivileges { .. })
        ));
        assert!(err.to_string().starts_with("inject network latency: "));
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_kill_passes_trimmed_signal_and_reports_default() {
        let mut killer = MockContainerKiller::new();
        killer
            .expect_kill_container()
            .withf(|id, signal| id == "api" && signal.is_empty())
            .returning(|_, _| Ok(()))
            .times(1);

        let runner = Runner::new().with_killer(Arc::new(killer));
        let result = runner.execute_experiment(&kill_experiment("api", "  ")).await;

        assert!(result.is_success());
        assert_eq!(result.message, "sent SIGKILL to api");
    }

    #[tokio::test]
    async fn test_kill_message_shows_requested_signal() {
        let mut killer = MockContainerKiller::new();
        killer
            .expect_kill_container()
            .withf(|_, signal| signal == "term")
            .returning(|_, _| Ok(()));

        let runner = Runner::new().with_killer(Arc::new(killer));
        let result = runner.execute_experiment(&kill_experiment("api", "term")).await;

        assert_eq!(result.message, "sent term to api");
    }

    #[tokio::test]
    async fn test_unsupported_fault_type() {
        let registry = Arc::new(TargetRegistry::new());
        let runner = Runner::new()
            .with_injector(Arc::new(MockFaultInjector::new()))
            .with_killer(Arc::new(MockContainerKiller::new()))
            .with_tracker(registry.clone());

        let mut experiment = kill_experiment("api", "");
        experiment.fault.fault_type = "reboot".to_string();

        let result = runner.execute_experiment(&experiment).await;
        assert!(matches!(
            result.error,
            Some(ExecutionError::UnsupportedFaultType(ref kind)) if kind == "reboot"
        ));
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_run_once_keeps_config_order() {
        let mut killer = MockContainerKiller::new();
        killer.expect_kill_container().returning(|_, _| Ok(()));
        let runner = Runner::new().with_killer(Arc::new(killer));

        let mut disabled = kill_experiment("db", "");
        disabled.name = "disabled".to_string();
        disabled.enabled = false;

        let config = ChaosConfig {
            experiments: vec![kill_experiment("api", "SIGTERM"), disabled],
        };

        let results = runner.run_once(&config).await;
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].name, "kill-api");
        assert!(results[0].is_success());
        assert!(results[1].skipped);
    }

    #[tokio::test]
    async fn test_apply_network_latency_requires_injector() {
        let err = Runner::new()
            .apply_network_latency("api", Duration::from_millis(10))
            .await
            .unwrap_err();
        assert!(matches!(err, ExecutionError::InjectorNotConfigured));
    }

    #[test]
    fn test_duration_clamps_negative() {
        let now = Utc::now();
        let result = ExperimentResult {
            name: "clock".to_string(),
            target_container: "api".to_string(),
            fault_type: "kill".to_string(),
            started_at: now,
            finished_at: now - chrono::Duration::seconds(5),
            skipped: false,
            message: String::new(),
            error: None,
        };
        assert_eq!(result.duration(), Duration::ZERO);
    }
}
