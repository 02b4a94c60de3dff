#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schema for the battery telemetry tools.
//!
//! - `Config` and sub-structs are deserialized from TOML; every section is
//!   optional and falls back to the defaults below.
//! - `validate()` rejects values that would only fail later at runtime.
use std::path::{Path, PathBuf};

use serde::Deserialize;

pub const DEFAULT_IOREG_PATH: &str = "/usr/sbin/ioreg";
pub const DEFAULT_CLASS: &str = "AppleSmartBattery";

const MAX_INTERVAL_MS: u64 = 60 * 60 * 1000;
const MAX_SOURCE_TIMEOUT_MS: u64 = 60 * 1000;
const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const ROTATIONS: [&str; 3] = ["never", "daily", "hourly"];

/// Where property snapshots come from.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    #[default]
    Ioreg,
    Fixture,
    Simulated,
}

impl SourceKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ioreg => "ioreg",
            Self::Fixture => "fixture",
            Self::Simulated => "simulated",
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SourceCfg {
    pub kind: SourceKind,
    /// Registry dump tool (kind = "ioreg")
    pub ioreg_path: PathBuf,
    /// Registry class to query (kind = "ioreg")
    pub class: String,
    /// Fixture file; required when kind = "fixture"
    pub fixture: Option<PathBuf>,
    /// Max time to wait for the dump tool before giving up
    pub timeout_ms: u64,
}

impl Default for SourceCfg {
    fn default() -> Self {
        Self {
            kind: SourceKind::Ioreg,
            ioreg_path: PathBuf::from(DEFAULT_IOREG_PATH),
            class: DEFAULT_CLASS.to_string(),
            fixture: None,
            timeout_ms: 2000,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct WatchCfg {
    pub interval_ms: u64,
    /// Number of polls; 0 runs until interrupted
    pub count: u64,
}

impl Default for WatchCfg {
    fn default() -> Self {
        Self {
            interval_ms: 2000,
            count: 0,
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct Config {
    pub source: SourceCfg,
    pub watch: WatchCfg,
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

/// Read and parse a config file.
///
/// When `allow_missing` is set, a file that does not exist yields
/// `Config::default()`; any other read or parse error is reported.
pub fn load_file(path: &Path, allow_missing: bool) -> eyre::Result<Config> {
    let text = match std::fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) if allow_missing && e.kind() == std::io::ErrorKind::NotFound => {
            return Ok(Config::default());
        }
        Err(e) => eyre::bail!("read config {}: {e}", path.display()),
    };
    load_toml(&text).map_err(|e| eyre::eyre!("parse config {}: {}", path.display(), e.message()))
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Source
        match self.source.kind {
            SourceKind::Fixture => match &self.source.fixture {
                None => eyre::bail!("source.fixture is required when source.kind = \"fixture\""),
                Some(p) if p.as_os_str().is_empty() => {
                    eyre::bail!("source.fixture must not be empty")
                }
                Some(_) => {}
            },
            SourceKind::Ioreg => {
                if self.source.ioreg_path.as_os_str().is_empty() {
                    eyre::bail!("source.ioreg_path must not be empty");
                }
                if self.source.class.trim().is_empty() {
                    eyre::bail!("source.class must not be empty");
                }
            }
            SourceKind::Simulated => {}
        }
        if self.source.timeout_ms == 0 {
            eyre::bail!("source.timeout_ms must be >= 1");
        }
        if self.source.timeout_ms > MAX_SOURCE_TIMEOUT_MS {
            eyre::bail!("source.timeout_ms is unreasonably large (>1min)");
        }

        // Watch
        if self.watch.interval_ms == 0 {
            eyre::bail!("watch.interval_ms must be >= 1");
        }
        if self.watch.interval_ms > MAX_INTERVAL_MS {
            eyre::bail!("watch.interval_ms is unreasonably large (>1h)");
        }

        // Logging
        if let Some(level) = self.logging.level.as_deref()
            && !LEVELS.contains(&level.to_ascii_lowercase().as_str())
        {
            eyre::bail!("logging.level must be one of {}", LEVELS.join(", "));
        }
        if let Some(rotation) = self.logging.rotation.as_deref()
            && !ROTATIONS.contains(&rotation.to_ascii_lowercase().as_str())
        {
            eyre::bail!("logging.rotation must be one of {}", ROTATIONS.join(", "));
        }

        Ok(())
    }
}
