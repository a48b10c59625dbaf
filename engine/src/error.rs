//! Engine error types
//!
//! [`FaultError`] keeps host and namespace failures apart so operators can
//! react differently: a timeout may be retried, a permission failure needs
//! someone to fix host privileges, and an unavailable namespace usually
//! means the container exited mid-operation.

use std::fmt;
use std::time::Duration;
use thiserror::Error;

use shared::SharedError;

/// Failures raised by fault injectors and the container killer
#[derive(Error, Debug)]
pub enum FaultError {
    #[error("container id is required")]
    InvalidContainerId,

    #[error("latency duration must be at least one microsecond")]
    InvalidLatencyDuration,

    #[error("invalid kill signal: {signal:?}")]
    InvalidKillSignal { signal: String },

    #[error("namespace tooling is unavailable on host: binary {binary:?} not found on host")]
    NamespaceToolMissing { binary: String },

    /// The target image ships without tc. A privileged sidecar joining the
    /// same network namespace can run tc instead.
    #[error("iproute2/tc is not available in target namespace: container namespace does not expose tc/iproute2")]
    IpRoute2Missing,

    #[error("container network namespace is unavailable: {stderr}")]
    NetworkNamespaceUnavailable { stderr: String },

    #[error("insufficient privileges to alter qdisc: {stderr}")]
    InsufficientPrivileges { stderr: String },

    #[error("fault injection command timed out after {timeout:?}")]
    CommandTimeout { timeout: Duration },

    #[error("tc command execution failed: {detail}: {stderr}")]
    TcCommandFailed { detail: String, stderr: String },

    #[error("container kill failed: {source}")]
    ContainerKillFailed {
        #[source]
        source: RuntimeError,
    },

    #[error("resolve pid for container {container_id:?}: {source}")]
    PidResolution {
        container_id: String,
        #[source]
        source: RuntimeError,
    },

    #[error("this injector supports linux hosts only")]
    UnsupportedPlatform,
}

impl FaultError {
    /// Only timeouts are worth retrying; everything else needs a human
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::CommandTimeout { .. })
    }

    /// Whether tc reported that there was no qdisc to delete
    pub fn is_missing_qdisc(&self) -> bool {
        let raw = self.to_string().to_lowercase();
        raw.contains("no such file")
            || raw.contains("cannot find qdisc")
            || raw.contains("handle of zero")
    }
}

pub type FaultResult<T> = Result<T, FaultError>;

/// Failures from the container runtime collaborator
#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("container id is required")]
    MissingContainerId,

    #[error("container {container_id:?} is not running")]
    NotRunning { container_id: String },

    #[error("container {container_id:?} has invalid pid {pid}")]
    InvalidPid { container_id: String, pid: i64 },

    #[error("docker {operation} failed: {message}")]
    CommandFailed { operation: String, message: String },

    #[error("docker {operation} timed out after {timeout:?}")]
    Timeout { operation: String, timeout: Duration },

    #[error("unexpected docker output: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RuntimeError {
    pub fn command_failed(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CommandFailed {
            operation: operation.into(),
            message: message.into(),
        }
    }
}

pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// Why a single experiment execution failed
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("target container is required")]
    MissingTarget,

    #[error("fault injector is not configured")]
    InjectorNotConfigured,

    #[error("container killer is not configured")]
    KillerNotConfigured,

    #[error("parse network-latency delay {delay:?}: {source}")]
    InvalidDelay {
        delay: String,
        #[source]
        source: SharedError,
    },

    #[error("inject network latency: {0}")]
    Inject(#[source] FaultError),

    #[error("kill container: {0}")]
    Kill(#[source] FaultError),

    #[error("unsupported fault type {0:?}")]
    UnsupportedFaultType(String),
}

impl ExecutionError {
    /// The injector or killer failure underneath, if any
    pub fn fault_error(&self) -> Option<&FaultError> {
        match self {
            Self::Inject(err) | Self::Kill(err) => Some(err),
            _ => None,
        }
    }
}

/// Problem with one experiment's schedule
#[derive(Error, Debug)]
pub enum ScheduleEntryError {
    #[error("experiment {name:?} has invalid schedule.every: {source}")]
    InvalidEvery {
        name: String,
        #[source]
        source: SharedError,
    },

    #[error("experiment {name:?} schedule.every must be greater than zero")]
    ZeroEvery { name: String },

    #[error("experiment {name:?} has invalid schedule.jitter: {source}")]
    InvalidJitter {
        name: String,
        #[source]
        source: SharedError,
    },
}

#[derive(Error, Debug)]
pub enum SchedulerError {
    #[error("config has no experiments")]
    NoExperiments,

    #[error("config has no enabled experiments")]
    NoEnabledExperiments,

    #[error(transparent)]
    InvalidSchedule(#[from] AggregateError<ScheduleEntryError>),
}

/// One failed step of a panic-button sweep
#[derive(Error, Debug)]
pub enum RollbackError {
    #[error("revert latency on {container_id}: {source}")]
    Revert {
        container_id: String,
        #[source]
        source: FaultError,
    },

    #[error("restart {container_id}: {source}")]
    Restart {
        container_id: String,
        #[source]
        source: RuntimeError,
    },
}

impl RollbackError {
    pub fn container_id(&self) -> &str {
        match self {
            Self::Revert { container_id, .. } | Self::Restart { container_id, .. } => container_id,
        }
    }
}

/// Several independent failures reported together, one per line
#[derive(Debug)]
pub struct AggregateError<E> {
    errors: Vec<E>,
}

impl<E> AggregateError<E> {
    /// `Ok(())` when nothing failed, otherwise every collected error
    pub fn check(errors: Vec<E>) -> Result<(), Self> {
        if errors.is_empty() {
            Ok(())
        } else {
            Err(Self { errors })
        }
    }

    pub fn errors(&self) -> &[E] {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl<E: fmt::Display> fmt::Display for AggregateError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{err}")?;
        }
        Ok(())
    }
}

impl<E: std::error::Error> std::error::Error for AggregateError<E> {}
