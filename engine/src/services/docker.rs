//! Docker runtime service implementation
//!
//! Thin wrapper over the host `docker` CLI providing pid lookup, signal
//! delivery, restarts and container listing for the engine.

use async_trait::async_trait;
use serde::Deserialize;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

use crate::error::{RuntimeError, RuntimeResult};
use crate::traits::{ContainerRestarter, KillExecutor, PidResolver};

const DEFAULT_DOCKER_BINARY: &str = "docker";
const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

/// One line of `docker ps --format {{json .}}`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ContainerSummary {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Names")]
    pub name: String,
    #[serde(rename = "Image")]
    pub image: String,
    #[serde(rename = "Status")]
    pub status: String,
}

impl ContainerSummary {
    pub fn short_id(&self) -> &str {
        self.id.get(..12).unwrap_or(&self.id)
    }
}

#[derive(Debug, Deserialize)]
struct ContainerState {
    #[serde(rename = "Running", default)]
    running: bool,
    #[serde(rename = "Pid", default)]
    pid: i64,
}

/// Container runtime backed by the docker CLI
#[derive(Debug, Clone)]
pub struct DockerCli {
    binary: String,
    command_timeout: Duration,
}

impl DockerCli {
    pub fn new() -> Self {
        Self {
            binary: DEFAULT_DOCKER_BINARY.to_string(),
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }

    /// Configure the docker binary path (fluent API)
    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Configure the per-command timeout (fluent API)
    pub fn with_command_timeout(mut self, command_timeout: Duration) -> Self {
        self.command_timeout = command_timeout;
        self
    }

    /// Running containers as reported by `docker ps`
    pub async fn list_running_containers(&self) -> RuntimeResult<Vec<ContainerSummary>> {
        let stdout = self.run("ps", &["ps", "--format", "{{json .}}"]).await?;
        parse_container_list(&stdout)
    }

    async fn run(&self, operation: &str, args: &[&str]) -> RuntimeResult<String> {
        let mut cmd = Command::new(&self.binary);
        cmd.args(args).stdin(Stdio::null()).kill_on_drop(true);

        tracing::debug!("🐳 {} {}", self.binary, args.join(" "));
        let output = tokio::time::timeout(self.command_timeout, cmd.output())
            .await
            .map_err(|_| RuntimeError::Timeout {
                operation: operation.to_string(),
                timeout: self.command_timeout,
            })??;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let message = match stderr.trim() {
                "" => output.status.to_string(),
                trimmed => trimmed.to_string(),
            };
            return Err(RuntimeError::command_failed(operation, message));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for DockerCli {
    fn default() -> Self {
        Self::new()
    }
}

fn require_id(container_id: &str) -> RuntimeResult<&str> {
    match container_id.trim() {
        "" => Err(RuntimeError::MissingContainerId),
        id => Ok(id),
    }
}

#[async_trait]
impl PidResolver for DockerCli {
    async fn container_pid(&self, container_id: &str) -> RuntimeResult<u32> {
        let id = require_id(container_id)?;
        let stdout = self
            .run("inspect", &["inspect", "--format", "{{json .State}}", id])
            .await?;
        parse_state_pid(id, &stdout)
    }
}

#[async_trait]
impl KillExecutor for DockerCli {
    async fn kill(&self, container_id: &str, signal: &str) -> RuntimeResult<()> {
        let id = require_id(container_id)?;
        self.run("kill", &["kill", "--signal", signal, id]).await?;
        Ok(())
    }
}

#[async_trait]
impl ContainerRestarter for DockerCli {
    async fn restart(&self, container_id: &str) -> RuntimeResult<()> {
        let id = require_id(container_id)?;
        self.run("restart", &["restart", id]).await?;
        Ok(())
    }
}

fn parse_state_pid(container_id: &str, raw: &str) -> RuntimeResult<u32> {
    let state: ContainerState = serde_json::from_str(raw.trim())?;
    if !state.running {
        return Err(RuntimeError::NotRunning {
            container_id: container_id.to_string(),
        });
    }

    match u32::try_from(state.pid) {
        Ok(pid) if pid > 0 => Ok(pid),
        _ => Err(RuntimeError::InvalidPid {
            container_id: container_id.to_string(),
            pid: state.pid,
        }),
    }
}

fn parse_container_list(raw: &str) -> RuntimeResult<Vec<ContainerSummary>> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| serde_json::from_str(line).map_err(RuntimeError::from))
        .collect()
}
