//! Human-readable error descriptions and structured JSON error formatting.

use battinfo_core::EngineError;

use crate::error::InvalidConfig;

pub const EXIT_GENERIC: i32 = 1;
pub const EXIT_CONFIG: i32 = 3;
pub const EXIT_SOURCE: i32 = 4;

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    // Typed matches first
    if let Some(InvalidConfig(msg)) = err.downcast_ref::<InvalidConfig>() {
        return format!(
            "What happened: Invalid configuration ({msg}).\nLikely causes: Unreadable file, TOML syntax error, or out-of-range values.\nHow to fix: Edit the config file (or pass --config), then rerun."
        );
    }

    if let Some(ee) = err.downcast_ref::<EngineError>() {
        return match ee {
            EngineError::SourceSpawn(msg) => format!(
                "What happened: The registry tool could not be started ({msg}).\nLikely causes: Not running on a host with ioreg, or source.ioreg_path points to the wrong file.\nHow to fix: Set source.ioreg_path, or use source.kind = \"fixture\" or \"simulated\" in the config."
            ),
            EngineError::SourceFailed(msg) => format!(
                "What happened: The registry tool failed ({msg}).\nLikely causes: No battery registered under source.class, or the tool hung past source.timeout_ms.\nHow to fix: Check source.class, raise source.timeout_ms, or rerun with --log-level=debug."
            ),
            EngineError::SourceUnavailable(msg) => format!(
                "What happened: No registry snapshot was available ({msg}).\nLikely causes: Fixture file missing or malformed.\nHow to fix: Check source.fixture, or drop --strict to accept an empty export."
            ),
        };
    }

    // String-based heuristics for errors raised without a typed wrapper
    let msg = err.to_string();
    let lower = msg.to_ascii_lowercase();

    if lower.contains("self-check failed") {
        return format!(
            "What happened: {msg}.\nLikely causes: Engine regression.\nHow to fix: Run the test suite and compare against the expected reading order."
        );
    }

    if lower.contains("write export") {
        return format!(
            "What happened: {msg}.\nLikely causes: Output directory missing or not writable.\nHow to fix: Pick a writable --out path."
        );
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Stable exit codes: 3 for config problems, 4 for source failures, 1 otherwise.
/// Usage errors exit with 2 from clap before reaching here.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    if err.downcast_ref::<InvalidConfig>().is_some() {
        return EXIT_CONFIG;
    }
    if err.downcast_ref::<EngineError>().is_some() {
        return EXIT_SOURCE;
    }
    EXIT_GENERIC
}

fn reason_name(err: &eyre::Report) -> &'static str {
    if err.downcast_ref::<InvalidConfig>().is_some() {
        return "InvalidConfig";
    }
    match err.downcast_ref::<EngineError>() {
        Some(EngineError::SourceSpawn(_)) => "SourceSpawn",
        Some(EngineError::SourceFailed(_)) => "SourceFailed",
        Some(EngineError::SourceUnavailable(_)) => "SourceUnavailable",
        None => "Error",
    }
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    serde_json::json!({ "reason": reason_name(err), "message": humanize(err) }).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_map_to_exit_3() {
        let err = eyre::Report::new(InvalidConfig("watch.interval_ms must be >= 1".into()));
        assert_eq!(exit_code_for_error(&err), EXIT_CONFIG);
        assert!(humanize(&err).contains("watch.interval_ms"));
        let v: serde_json::Value = serde_json::from_str(&format_error_json(&err)).unwrap();
        assert_eq!(v["reason"], "InvalidConfig");
    }

    #[test]
    fn source_errors_map_to_exit_4() {
        let err = eyre::Report::new(EngineError::SourceSpawn("no such file".into()));
        assert_eq!(exit_code_for_error(&err), EXIT_SOURCE);
        assert!(humanize(&err).contains("source.ioreg_path"));
        let v: serde_json::Value = serde_json::from_str(&format_error_json(&err)).unwrap();
        assert_eq!(v["reason"], "SourceSpawn");
    }

    #[test]
    fn other_errors_are_generic() {
        let err = eyre::eyre!("boom");
        assert_eq!(exit_code_for_error(&err), EXIT_GENERIC);
        assert!(humanize(&err).contains("Original: boom"));
        let v: serde_json::Value = serde_json::from_str(&format_error_json(&err)).unwrap();
        assert_eq!(v["reason"], "Error");
    }
}
