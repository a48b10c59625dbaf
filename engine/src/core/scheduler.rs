//! Scheduled experiment execution
//!
//! Each enabled experiment gets its own task that sleeps for
//! `every + random(0..=jitter)`, executes, hands the result to the caller's
//! callback, and samples a fresh interval for the next round. All tasks watch
//! one cancellation token and [`Runner::run_scheduled`] only returns once
//! every task has exited.

use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use shared::{parse_duration, ChaosConfig, Experiment};

use super::executor::{ExperimentResult, Runner};
use crate::error::{AggregateError, ScheduleEntryError, SchedulerError};

/// An enabled experiment with its cadence already parsed
#[derive(Debug, Clone)]
pub struct ScheduledExperiment {
    pub experiment: Experiment,
    pub every: Duration,
    pub jitter: Duration,
}

impl Runner {
    /// Run every enabled experiment on its own cadence until `shutdown` fires.
    ///
    /// Setup is all-or-nothing: schedule problems across all experiments are
    /// reported together before any task starts. `on_result` is called from
    /// the experiment's task, so it should return quickly.
    pub async fn run_scheduled<F>(
        &self,
        config: &ChaosConfig,
        shutdown: CancellationToken,
        on_result: F,
    ) -> Result<(), SchedulerError>
    where
        F: Fn(ExperimentResult) + Send + Sync + 'static,
    {
        if config.experiments.is_empty() {
            return Err(SchedulerError::NoExperiments);
        }

        let scheduled = parse_schedule(&config.experiments)?;
        if scheduled.is_empty() {
            return Err(SchedulerError::NoEnabledExperiments);
        }

        tracing::info!("⏱️ Scheduling {} experiments", scheduled.len());

        let on_result = Arc::new(on_result);
        let mut tasks = JoinSet::new();

        for job in scheduled {
            let runner = self.clone();
            let shutdown = shutdown.clone();
            let on_result = on_result.clone();

            tasks.spawn(async move {
                tracing::debug!(
                    experiment = %job.experiment.name,
                    every = ?job.every,
                    jitter = ?job.jitter,
                    "🗓️ Experiment loop started"
                );

                loop {
                    let wait = next_interval(job.every, job.jitter);
                    tokio::select! {
                        biased;
                        _ = shutdown.cancelled() => break,
                        _ = tokio::time::sleep(wait) => {}
                    }

                    let result = runner.execute_experiment(&job.experiment).await;
                    on_result(result);
                }

                tracing::debug!(experiment = %job.experiment.name, "🛑 Experiment loop stopped");
            });
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(err) = joined {
                tracing::error!("❌ Scheduled experiment task failed: {}", err);
            }
        }

        tracing::info!("🏁 All scheduled experiments stopped");
        Ok(())
    }
}

/// Parse cadences for the enabled experiments, collecting every problem
pub fn parse_schedule(
    experiments: &[Experiment],
) -> Result<Vec<ScheduledExperiment>, AggregateError<ScheduleEntryError>> {
    let mut scheduled = Vec::with_capacity(experiments.len());
    let mut errors = Vec::new();

    for experiment in experiments.iter().filter(|exp| exp.enabled) {
        let every = match parse_duration(&experiment.schedule.every) {
            Ok(every) => every,
            Err(source) => {
                errors.push(ScheduleEntryError::InvalidEvery {
                    name: experiment.name.clone(),
                    source,
                });
                continue;
            }
        };
        if every.is_zero() {
            errors.push(ScheduleEntryError::ZeroEvery {
                name: experiment.name.clone(),
            });
            continue;
        }

        let jitter = if experiment.schedule.jitter.is_empty() {
            Duration::ZERO
        } else {
            match parse_duration(&experiment.schedule.jitter) {
                Ok(jitter) => jitter,
                Err(source) => {
                    errors.push(ScheduleEntryError::InvalidJitter {
                        name: experiment.name.clone(),
                        source,
                    });
                    continue;
                }
            }
        };

        scheduled.push(ScheduledExperiment {
            experiment: experiment.clone(),
            every,
            jitter,
        });
    }

    AggregateError::check(errors)?;
    Ok(scheduled)
}

/// `every` plus a uniform sample from `[0, jitter]`
pub fn next_interval(every: Duration, jitter: Duration) -> Duration {
    if jitter.is_zero() {
        return every;
    }

    let max_nanos = u64::try_from(jitter.as_nanos()).unwrap_or(u64::MAX);
    let extra = rand::thread_rng().gen_range(0..=max_nanos);
    every.saturating_add(Duration::from_nanos(extra))
}
