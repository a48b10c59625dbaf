//! YAML experiment file loading and validation

use std::path::Path;

use super::{parse_duration, ChaosConfig, FaultKind};
use crate::errors::{SharedError, SharedResult};
use crate::signal::is_supported_signal;

/// Starter config written by `--init-config`
pub const DEFAULT_CHAOS_YAML: &str = r#"experiments:
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
    enabled: true
    fault:
      type: network-latency
      delay: 120ms
    schedule:
      every: 30s
      jitter: 3s

  - name: kill-db
    targetContainer: postgres
    enabled: true
    fault:
      type: kill
      signal: SIGTERM
    schedule:
      every: 120s
"#;

/// Read, parse and validate an experiment file
pub fn load_chaos_config(path: impl AsRef<Path>) -> SharedResult<ChaosConfig> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|source| SharedError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;

    let config: ChaosConfig =
        serde_yaml::from_str(&raw).map_err(|source| SharedError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;

    validate(&config)?;
    tracing::debug!("Loaded {} experiments from {}", config.experiments.len(), path.display());
    Ok(config)
}

/// Check every experiment, stopping at the first problem
pub fn validate(config: &ChaosConfig) -> SharedResult<()> {
    if config.experiments.is_empty() {
        return Err(SharedError::NoExperiments);
    }

    for (i, exp) in config.experiments.iter().enumerate() {
        let field = |name: &str| format!("experiments[{i}].{name}");

        if exp.name.trim().is_empty() {
            return Err(SharedError::invalid(field("name"), "is required"));
        }
        if exp.target_container.trim().is_empty() {
            return Err(SharedError::invalid(field("targetContainer"), "is required"));
        }
        if exp.fault.fault_type.trim().is_empty() {
            return Err(SharedError::invalid(field("fault.type"), "is required"));
        }
        if exp.schedule.every.trim().is_empty() {
            return Err(SharedError::invalid(field("schedule.every"), "is required"));
        }
        if let Err(err) = parse_duration(&exp.schedule.every) {
            return Err(SharedError::invalid(
                field("schedule.every"),
                format!("must be a valid duration: {err}"),
            ));
        }
        if !exp.schedule.jitter.is_empty() {
            if let Err(err) = parse_duration(&exp.schedule.jitter) {
                return Err(SharedError::invalid(
                    field("schedule.jitter"),
                    format!("must be a valid duration: {err}"),
                ));
            }
        }

        match exp.fault.kind() {
            Some(FaultKind::NetworkLatency) => {
                if exp.fault.delay.trim().is_empty() {
                    return Err(SharedError::invalid(
                        field("fault.delay"),
                        "is required for network-latency",
                    ));
                }
                if let Err(err) = parse_duration(&exp.fault.delay) {
                    return Err(SharedError::invalid(
                        field("fault.delay"),
                        format!("must be a valid duration: {err}"),
                    ));
                }
            }
            Some(FaultKind::Kill) => {
                if !exp.fault.signal.is_empty() && !is_supported_signal(&exp.fault.signal) {
                    return Err(SharedError::invalid(
                        field("fault.signal"),
                        format!("{:?} is not supported", exp.fault.signal),
                    ));
                }
            }
            None => {
                return Err(SharedError::invalid(
                    field("fault.type"),
                    format!("{:?} is unsupported", exp.fault.fault_type),
                ));
            }
        }
    }

    Ok(())
}

/// Write [`DEFAULT_CHAOS_YAML`] to `path`, refusing to clobber unless `force`
pub fn write_default_config(path: &str, force: bool) -> SharedResult<()> {
    let clean_path = path.trim();
    if clean_path.is_empty() {
        return Err(SharedError::MissingConfigPath);
    }

    let target = Path::new(clean_path);
    if !force && target.exists() {
        return Err(SharedError::ConfigExists {
            path: target.to_path_buf(),
        });
    }

    std::fs::write(target, DEFAULT_CHAOS_YAML).map_err(|source| SharedError::ConfigWrite {
        path: target.to_path_buf(),
        source,
    })
}
