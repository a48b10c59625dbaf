//! Kill signal allow-list and normalisation

/// Signal sent when an experiment does not name one
pub const DEFAULT_KILL_SIGNAL: &str = "SIGKILL";

/// Signals a `kill` fault is allowed to deliver
pub const SUPPORTED_SIGNALS: [&str; 7] = [
    "SIGKILL", "SIGTERM", "SIGINT", "SIGQUIT", "SIGHUP", "SIGUSR1", "SIGUSR2",
];

/// Normalise a user supplied signal name.
///
/// Blank input maps to [`DEFAULT_KILL_SIGNAL`], case is ignored and a missing
/// `SIG` prefix is added, so `"term"` becomes `"SIGTERM"`. Returns `None`
/// when the result is not in [`SUPPORTED_SIGNALS`].
pub fn normalize_signal(raw: &str) -> Option<&'static str> {
    let mut normalized = raw.trim().to_ascii_uppercase();
    if normalized.is_empty() {
        normalized = DEFAULT_KILL_SIGNAL.to_string();
    }
    if !normalized.starts_with("SIG") {
        normalized.insert_str(0, "SIG");
    }

    SUPPORTED_SIGNALS
        .iter()
        .copied()
        .find(|supported| *supported == normalized)
}

pub fn is_supported_signal(raw: &str) -> bool {
    normalize_signal(raw).is_some()
}
