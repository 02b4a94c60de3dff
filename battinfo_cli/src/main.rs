mod cli;
mod commands;
mod error;
mod error_fmt;
mod logging;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use battinfo_config::Config;
use battinfo_traits::MonotonicClock;
use clap::Parser;

use crate::cli::{Cli, Commands, DEFAULT_CONFIG, JSON_MODE};
use crate::error::InvalidConfig;
use crate::error_fmt::{exit_code_for_error, format_error_json, humanize};

fn main() {
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);

    if let Err(err) = run(cli) {
        if JSON_MODE.get().copied().unwrap_or(false) {
            eprintln!("{}", format_error_json(&err));
        } else {
            eprintln!("{}", humanize(&err));
        }
        std::process::exit(exit_code_for_error(&err));
    }
}

/// An explicit `--config` must exist; the default path may be absent.
fn load_config(path: Option<&Path>) -> eyre::Result<Config> {
    let (path, allow_missing) = match path {
        Some(p) => (p.to_path_buf(), false),
        None => (PathBuf::from(DEFAULT_CONFIG), true),
    };
    let cfg = battinfo_config::load_file(&path, allow_missing)
        .map_err(|e| InvalidConfig(e.to_string()))?;
    cfg.validate().map_err(|e| InvalidConfig(e.to_string()))?;
    Ok(cfg)
}

fn run(cli: Cli) -> eyre::Result<()> {
    let cfg = load_config(cli.config.as_deref())?;
    // Held until the command's outcome is logged so the file writer flushes it.
    let _log_guard = logging::init_tracing(cli.json, cli.log_level.as_deref(), &cfg.logging)?;

    let res = execute(cli, &cfg);
    if let Err(err) = &res {
        tracing::debug!(error = ?err, "command failed");
    }
    res
}

fn execute(cli: Cli, cfg: &Config) -> eyre::Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.cmd {
        Commands::Show { explain } => {
            let mut source = commands::build_source(&cfg.source)?;
            commands::show(
                &mut *source,
                cli.json,
                explain,
                &mut out,
                &mut std::io::stderr().lock(),
            )
        }
        Commands::Export { out: path, strict } => {
            let mut source = commands::build_source(&cfg.source)?;
            commands::export(&mut *source, path.as_deref(), strict, &mut out)
        }
        Commands::Watch { interval_ms, count } => {
            let interval_ms = interval_ms.unwrap_or(cfg.watch.interval_ms);
            if interval_ms == 0 {
                return Err(InvalidConfig("--interval-ms must be >= 1".into()).into());
            }
            let opts = commands::WatchOpts {
                interval: Duration::from_millis(interval_ms),
                count: count.unwrap_or(cfg.watch.count),
                json: cli.json,
            };

            let shutdown = Arc::new(AtomicBool::new(false));
            let flag = shutdown.clone();
            ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed))
                .map_err(|e| eyre::eyre!("install Ctrl-C handler: {e}"))?;

            let mut source = commands::build_source(&cfg.source)?;
            let polls = commands::watch(&mut *source, &MonotonicClock::new(), &opts, &shutdown, &mut out)?;
            tracing::debug!(polls, "watch finished");
            Ok(())
        }
        Commands::SelfCheck => {
            commands::self_check()?;
            writeln!(out, "ok")?;
            Ok(())
        }
    }
}
