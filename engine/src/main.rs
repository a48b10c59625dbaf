//! Main entry point for the chaos-dock binary
//!
//! Wires the docker CLI runtime into the runner and panic button, then
//! dispatches on the selected mode.

use anyhow::Context;
use clap::{error::ErrorKind, CommandFactory, Parser};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use engine::{
    services::{platform_latency_injector, ContainerKillInjector, DockerCli},
    ExperimentResult, PanicButton, Runner, TargetRegistry,
};
use shared::{config::write_default_config, format_duration, load_chaos_config, ChaosConfig};

/// Chaos experiments for Docker containers
#[derive(Parser, Debug)]
#[command(name = "chaos-dock")]
#[command(about = "Injects network latency and kill faults into Docker containers")]
pub struct Args {
    /// Path to the chaos experiment config
    #[arg(long, default_value = "chaos.yaml")]
    pub config: String,

    /// Execute every experiment exactly once
    #[arg(long)]
    pub run_once: bool,

    /// Execute enabled experiments continuously on their schedules
    #[arg(long)]
    pub run_scheduled: bool,

    /// Revert network faults and restart containers
    #[arg(long)]
    pub panic: bool,

    /// Comma-separated container IDs/names used by --panic
    #[arg(long, default_value = "")]
    pub targets: String,

    /// List running containers from the Docker daemon
    #[arg(long)]
    pub list: bool,

    /// Create a starter chaos config at the --config path
    #[arg(long)]
    pub init_config: bool,

    /// Validate the chaos config and print an experiment summary
    #[arg(long)]
    pub validate_config: bool,

    /// Allow overwriting an existing file with --init-config
    #[arg(long)]
    pub force: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Args {
    fn runtime_command(&self) -> bool {
        self.run_once || self.run_scheduled || self.panic || self.list
    }

    fn has_mode(&self) -> bool {
        self.runtime_command() || self.init_config || self.validate_config
    }

    /// Reject flag combinations that select more than one mode
    fn check_modes(&self) -> Result<(), &'static str> {
        if self.run_once && self.run_scheduled {
            return Err("choose exactly one of --run-once or --run-scheduled");
        }
        if self.init_config && self.validate_config {
            return Err("choose exactly one of --init-config or --validate-config");
        }
        if self.init_config && self.runtime_command() {
            return Err("--init-config cannot be combined with runtime fault commands");
        }
        if self.validate_config && self.runtime_command() {
            return Err("--validate-config cannot be combined with runtime fault commands");
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if let Err(msg) = args.check_modes() {
        Args::command().error(ErrorKind::ArgumentConflict, msg).exit();
    }

    if !args.has_mode() {
        Args::command().print_help()?;
        std::process::exit(2);
    }

    shared::logging::init_tracing(&args.log_level);

    if args.init_config {
        write_default_config(&args.config, args.force).context("initialize config")?;
        tracing::info!("📝 Created {}", args.config.trim());
        return Ok(());
    }

    if args.validate_config {
        let config = load_chaos_config(&args.config).context("config validation failed")?;
        log_config_summary(&config);
        return Ok(());
    }

    warn_if_not_root();

    let docker = Arc::new(DockerCli::new());
    let injector = platform_latency_injector(docker.clone());
    let registry = Arc::new(TargetRegistry::new());

    let runner = Runner::new()
        .with_injector(injector.clone())
        .with_killer(Arc::new(ContainerKillInjector::new(docker.clone())))
        .with_tracker(registry.clone());

    let panic_button = PanicButton::new()
        .with_injector(injector)
        .with_restarter(docker.clone())
        .with_registry(registry);

    if args.list {
        return list_containers(&docker).await;
    }

    if args.panic {
        panic_button
            .trigger(&split_csv(&args.targets))
            .await
            .context("panic rollback failed")?;
        tracing::info!("✅ Panic rollback completed");
        return Ok(());
    }

    let config = load_chaos_config(&args.config).context("load config")?;

    if args.run_once {
        let results = runner.run_once(&config).await;
        let mut had_error = false;
        for result in &results {
            had_error |= result.error.is_some();
            log_result(result);
        }
        if had_error {
            std::process::exit(1);
        }
        return Ok(());
    }

    let shutdown = CancellationToken::new();
    spawn_shutdown_listener(shutdown.clone());

    tracing::info!("🚀 Starting scheduled chaos experiments; press Ctrl+C to stop");
    runner
        .run_scheduled(&config, shutdown, |result| log_result(&result))
        .await
        .context("run scheduled experiments")?;

    Ok(())
}

fn log_config_summary(config: &ChaosConfig) {
    tracing::info!(
        "✅ Config validation successful: {} experiments",
        config.experiments.len()
    );
    for exp in &config.experiments {
        let status = if exp.enabled { "enabled" } else { "disabled" };
        tracing::info!(
            "- {} [{}] target={} fault={} every={}",
            exp.name,
            status,
            exp.target_container,
            exp.fault.fault_type,
            exp.schedule.every
        );
    }
}

async fn list_containers(docker: &DockerCli) -> anyhow::Result<()> {
    let containers = docker
        .list_running_containers()
        .await
        .context("list containers")?;

    if containers.is_empty() {
        tracing::info!("No running containers found");
        return Ok(());
    }

    tracing::info!("🐳 Running containers:");
    for container in &containers {
        tracing::info!(
            "- {} ({}) image={} status={}",
            container.name,
            container.short_id(),
            container.image,
            container.status
        );
    }
    Ok(())
}

fn log_result(result: &ExperimentResult) {
    if result.skipped {
        tracing::info!("[SKIP] {} ({}): {}", result.name, result.fault_type, result.message);
    } else if let Some(err) = &result.error {
        tracing::error!("[FAIL] {} ({}): {}", result.name, result.fault_type, err);
    } else {
        tracing::info!(
            "[OK] {} ({}): {} (duration={})",
            result.name,
            result.fault_type,
            result.message,
            format_duration(round_to_centis(result.duration()))
        );
    }
}

fn round_to_centis(duration: Duration) -> Duration {
    let centis = (duration.as_millis() + 5) / 10;
    Duration::from_millis(u64::try_from(centis * 10).unwrap_or(u64::MAX))
}

/// Split a comma-separated list, dropping blank entries
fn split_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(unix)]
fn warn_if_not_root() {
    if !nix::unistd::geteuid().is_root() {
        tracing::warn!(
            "⚠️ Not running as root: network-latency faults need CAP_NET_ADMIN and access to container namespaces"
        );
    }
}

#[cfg(not(unix))]
fn warn_if_not_root() {}

fn spawn_shutdown_listener(shutdown: CancellationToken) {
    tokio::spawn(async move {
        wait_for_shutdown_signal().await;
        tracing::info!("🛑 Shutdown signal received, stopping experiments");
        shutdown.cancel();
    });
}

#[cfg(unix)]
async fn wait_for_shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = sigterm.recv() => {}
            }
        }
        Err(err) => {
            tracing::warn!("Failed to install SIGTERM handler: {}", err);
            let _ = tokio::signal::ctrl_c().await;
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("chaos-dock").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let args = parse(&[]);
        assert_eq!(args.config, "chaos.yaml");
        assert_eq!(args.log_level, "info");
        assert!(!args.has_mode());
    }

    #[test]
    fn test_mode_conflicts() {
        assert!(parse(&["--run-once", "--run-scheduled"]).check_modes().is_err());
        assert!(parse(&["--init-config", "--validate-config"]).check_modes().is_err());
        assert!(parse(&["--init-config", "--list"]).check_modes().is_err());
        assert!(parse(&["--validate-config", "--panic"]).check_modes().is_err());

        assert!(parse(&["--panic", "--targets", "api,db"]).check_modes().is_ok());
        assert!(parse(&["--init-config", "--force"]).check_modes().is_ok());
        assert!(parse(&["--run-once", "--config", "other.yaml"]).check_modes().is_ok());
    }

    #[test]
    fn test_split_csv() {
        assert_eq!(split_csv(" api, ,db,,cache "), vec!["api", "db", "cache"]);
        assert!(split_csv("").is_empty());
    }

    #[test]
    fn test_round_to_centis() {
        assert_eq!(round_to_centis(Duration::from_millis(1234)), Duration::from_millis(1230));
        assert_eq!(round_to_centis(Duration::from_millis(1236)), Duration::from_millis(1240));
        assert_eq!(round_to_centis(Duration::ZERO), Duration::ZERO);
    }
}
