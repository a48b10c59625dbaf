//! Test fixtures and data for engine tests

use shared::{ChaosConfig, Experiment, Fault, Schedule};

/// Standard test data and fixtures
pub struct TestFixtures;

impl TestFixtures {
    pub const DB_CONTAINER: &'static str = "postgres";
    pub const API_CONTAINER: &'static str = "api";

    pub const MIXED_YAML: &'static str = r#"experiments:
  - name: db-latency
    targetContainer: postgres
    enabled: true
    fault:
      type: network-latency
      delay: 500ms
    schedule:
      every: 60s
      jitter: 5s

  - name: api-latency
    targetContainer: api
    enabled: false
    fault:
      type: network-latency
      delay: 120ms
    schedule:
      every: 30s

  - name: kill-api
    targetContainer: api
    enabled: true
    fault:
      type: kill
      signal: term
    schedule:
      every: 120s
"#;

    pub fn latency(name: &str, target: &str, delay: &str) -> Experiment {
        Experiment {
            name: name.to_string(),
            target_container: target.to_string(),
            enabled: true,
            fault: Fault {
                fault_type: "network-latency".to_string(),
                delay: delay.to_string(),
                signal: String::new(),
            },
            schedule: Schedule {
                every: "60s".to_string(),
                jitter: "5s".to_string(),
            },
        }
    }

    pub fn kill(name: &str, target: &str, signal: &str) -> Experiment {
        Experiment {
            name: name.to_string(),
            target_container: target.to_string(),
            enabled: true,
            fault: Fault {
                fault_type: "kill".to_string(),
                delay: String::new(),
                signal: signal.to_string(),
            },
            schedule: Schedule {
                every: "120s".to_string(),
                jitter: String::new(),
            },
        }
    }

    pub fn with_schedule(mut experiment: Experiment, every: &str, jitter: &str) -> Experiment {
        experiment.schedule = Schedule {
            every: every.to_string(),
            jitter: jitter.to_string(),
        };
        experiment
    }

    pub fn config(experiments: Vec<Experiment>) -> ChaosConfig {
        ChaosConfig { experiments }
    }
}
