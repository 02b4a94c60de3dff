//! Tracing setup: console layer on stderr plus an optional JSON-lines file.

use std::path::Path;

use battinfo_config::Logging;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{self, RollingFileAppender};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Level precedence: `--log-level`, then `logging.level`, then `RUST_LOG`, then info.
fn filter(cli_level: Option<&str>, cfg_level: Option<&str>) -> EnvFilter {
    match cli_level.or(cfg_level) {
        Some(level) => EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info")),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    }
}

fn appender(file: &str, rotation: Option<&str>) -> eyre::Result<RollingFileAppender> {
    let path = Path::new(file);
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir)
        .map_err(|e| eyre::eyre!("create log directory {}: {e}", dir.display()))?;
    let name = path
        .file_name()
        .ok_or_else(|| eyre::eyre!("logging.file has no file name: {file}"))?;
    Ok(match rotation.map(str::to_ascii_lowercase).as_deref() {
        Some("daily") => rolling::daily(dir, name),
        Some("hourly") => rolling::hourly(dir, name),
        _ => rolling::never(dir, name),
    })
}

/// Install the global subscriber. The returned guard flushes the log file
/// when dropped, so keep it alive until the command finishes.
pub fn init_tracing(
    json: bool,
    cli_level: Option<&str>,
    logging: &Logging,
) -> eyre::Result<Option<WorkerGuard>> {
    let mut layers: Vec<BoxedLayer> = Vec::with_capacity(2);

    layers.push(if json {
        fmt::layer().json().with_writer(std::io::stderr).boxed()
    } else {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .boxed()
    });

    let mut guard = None;
    if let Some(file) = logging.file.as_deref() {
        let (writer, file_guard) =
            tracing_appender::non_blocking(appender(file, logging.rotation.as_deref())?);
        guard = Some(file_guard);
        layers.push(
            fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(writer)
                .boxed(),
        );
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(filter(cli_level, logging.level.as_deref()))
        .try_init()
        .map_err(|e| eyre::eyre!("init tracing: {e}"))?;
    Ok(guard)
}
