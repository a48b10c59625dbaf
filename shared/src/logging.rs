//! Tracing setup shared by the chaos-dock binary and its tests

use tracing_subscriber::{fmt, EnvFilter};

/// Crates whose events are shown at the requested level
const WORKSPACE_TARGETS: [&str; 3] = ["chaos_dock", "engine", "shared"];

/// Build the filter directive for a base level, e.g. `engine=debug,shared=debug,warn`
pub fn filter_directive(log_level: &str) -> String {
    let base_level = match log_level.trim() {
        "" => "info",
        level => level,
    };

    let mut directive = WORKSPACE_TARGETS
        .iter()
        .map(|target| format!("{target}={base_level}"))
        .collect::<Vec<_>>()
        .join(",");
    directive.push_str(",warn");
    directive
}

/// Initialize tracing subscriber writing to stdout.
///
/// `RUST_LOG` wins over `log_level` when it is set.
pub fn init_tracing(log_level: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(log_level)));

    // try_init so tests and repeated calls don't panic on a second subscriber
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directive_covers_workspace() {
        let directive = filter_directive("debug");
        assert_eq!(directive, "chaos_dock=debug,engine=debug,shared=debug,warn");
    }

    #[test]
    fn test_filter_directive_blank_defaults_to_info() {
        assert!(filter_directive(" ").starts_with("chaos_dock=info"));
    }
}
