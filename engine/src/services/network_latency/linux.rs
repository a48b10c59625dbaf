//! netem latency injection through the target's network namespace
//!
//! tc runs from the host via `nsenter --target <pid> --net --mount`, so the
//! container image does not need to cooperate beyond shipping iproute2.

use async_trait::async_trait;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use tokio::process::Command;

use crate::error::{FaultError, FaultResult};
use crate::traits::{FaultInjector, PidResolver};

const INTERFACE_NAME: &str = "eth0";
const DEFAULT_NSENTER_BINARY: &str = "nsenter";

/// Upper bound for a single namespace-crossing command
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(10);

pub struct NetworkLatencyInjector {
    pid_resolver: Arc<dyn PidResolver>,
    nsenter_binary: String,
    command_timeout: Duration,
}

impl NetworkLatencyInjector {
    pub fn new(pid_resolver: Arc<dyn PidResolver>) -> Self {
        Self {
            pid_resolver,
            nsenter_binary: DEFAULT_NSENTER_BINARY.to_string(),
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }

    /// Configure the nsenter binary path (fluent API)
    pub fn with_nsenter_binary(mut self, binary: impl Into<String>) -> Self {
        self.nsenter_binary = binary.into();
        self
    }

    /// Configure the per-command timeout (fluent API)
    pub fn with_command_timeout(mut self, command_timeout: Duration) -> Self {
        self.command_timeout = command_timeout;
        self
    }

    async fn resolve_pid(&self, container_id: &str) -> FaultResult<u32> {
        self.pid_resolver
            .container_pid(container_id)
            .await
            .map_err(|source| FaultError::PidResolution {
                container_id: container_id.to_string(),
                source,
            })
    }

    async fn run_tc(&self, pid: u32, tc_args: &[&str]) -> FaultResult<()> {
        let pid = pid.to_string();
        let mut args = vec!["--target", pid.as_str(), "--net", "--mount", "--", "tc"];
        args.extend_from_slice(tc_args);

        tracing::debug!("🔧 {} {}", self.nsenter_binary, args.join(" "));
        run_with_timeout(&self.nsenter_binary, &args, self.command_timeout).await
    }
}

#[async_trait]
impl FaultInjector for NetworkLatencyInjector {
    async fn inject_network_latency(&self, container_id: &str, delay: Duration) -> FaultResult<()> {
        let container_id = container_id.trim();
        if container_id.is_empty() {
            return Err(FaultError::InvalidContainerId);
        }
        // tc has no unit below a microsecond
        if delay.as_micros() == 0 {
            return Err(FaultError::InvalidLatencyDuration);
        }

        let pid = self.resolve_pid(container_id).await?;
        let delay_arg = tc_time(delay);
        self.run_tc(
            pid,
            &[
                "qdisc",
                "replace",
                "dev",
                INTERFACE_NAME,
                "root",
                "netem",
                "delay",
                delay_arg.as_str(),
            ],
        )
        .await?;

        tracing::info!(target_container = container_id, pid, "🐢 Added {} netem delay", delay_arg);
        Ok(())
    }

    async fn revert_network_latency(&self, container_id: &str) -> FaultResult<()> {
        let container_id = container_id.trim();
        if container_id.is_empty() {
            return Err(FaultError::InvalidContainerId);
        }

        let pid = self.resolve_pid(container_id).await?;
        match self
            .run_tc(pid, &["qdisc", "del", "dev", INTERFACE_NAME, "root"])
            .await
        {
            Ok(()) => {
                tracing::info!(target_container = container_id, pid, "🧹 Removed netem qdisc");
                Ok(())
            }
            Err(err) if err.is_missing_qdisc() => {
                tracing::debug!(target_container = container_id, "No qdisc to remove");
                Ok(())
            }
            Err(err) => Err(err),
        }
    }
}

/// Render a delay in a unit tc understands
fn tc_time(delay: Duration) -> String {
    if delay.subsec_micros() % 1000 == 0 {
        format!("{}ms", delay.as_millis())
    } else {
        format!("{}us", delay.as_micros())
    }
}

async fn run_with_timeout(binary: &str, args: &[&str], command_timeout: Duration) -> FaultResult<()> {
    let mut cmd = Command::new(binary);
    cmd.args(args).stdin(Stdio::null()).kill_on_drop(true);

    let output = match tokio::time::timeout(command_timeout, cmd.output()).await {
        Err(_) => {
            return Err(FaultError::CommandTimeout {
                timeout: command_timeout,
            })
        }
        Ok(Err(err)) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(FaultError::NamespaceToolMissing {
                binary: binary.to_string(),
            })
        }
        Ok(Err(err)) => {
            return Err(FaultError::TcCommandFailed {
                detail: err.to_string(),
                stderr: String::new(),
            })
        }
        Ok(Ok(output)) => output,
    };

    if output.status.success() {
        return Ok(());
    }

    Err(classify_failure(
        &output.status.to_string(),
        String::from_utf8_lossy(&output.stderr).trim(),
        String::from_utf8_lossy(&output.stdout).trim(),
    ))
}

/// Map a failed command's output onto the fault taxonomy
fn classify_failure(detail: &str, stderr: &str, stdout: &str) -> FaultError {
    let combined = format!("{stderr} {stdout} {detail}").to_lowercase();

    if combined.contains("tc: not found")
        || combined.contains("failed to execute tc")
        || combined.contains("executable file not found")
        || combined.contains("command not found")
    {
        FaultError::IpRoute2Missing
    } else if combined.contains("cannot open network namespace")
        || combined.contains("no such file or directory")
    {
        FaultError::NetworkNamespaceUnavailable {
            stderr: stderr.to_string(),
        }
    } else if combined.contains("operation not permitted") || combined.contains("permission denied") {
        FaultError::InsufficientPrivileges {
            stderr: stderr.to_string(),
        }
    } else {
        FaultError::TcCommandFailed {
            detail: detail.to_string(),
            stderr: stderr.to_string(),
        }
    }
}
