//! Subcommand bodies: source selection, polling, and output.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use battinfo_config::{SourceCfg, SourceKind};
use battinfo_core::{Label, TelemetrySequence, assemble, poll, poll_with_report, try_poll};
use battinfo_hardware::{FixtureSource, IoregSource, SimulatedSource};
use battinfo_traits::{Clock, PropertySource};

/// Longest single sleep in the watch loop, so Ctrl-C is honored promptly.
const SHUTDOWN_SLICE: Duration = Duration::from_millis(50);

pub fn build_source(cfg: &SourceCfg) -> eyre::Result<Box<dyn PropertySource>> {
    let source: Box<dyn PropertySource> = match cfg.kind {
        SourceKind::Ioreg => {
            let src = IoregSource::new(&cfg.ioreg_path, cfg.class.as_str())
                .with_timeout(Duration::from_millis(cfg.timeout_ms));
            if !src.is_available() {
                tracing::warn!(
                    path = %cfg.ioreg_path.display(),
                    "registry tool not found; readings will be empty"
                );
            }
            Box::new(src)
        }
        SourceKind::Fixture => {
            let path = cfg
                .fixture
                .as_ref()
                .ok_or_else(|| eyre::eyre!("source.fixture is required for fixture source"))?;
            Box::new(FixtureSource::new(path))
        }
        SourceKind::Simulated => Box::new(SimulatedSource::typical()),
    };
    tracing::debug!(kind = cfg.kind.as_str(), "property source selected");
    Ok(source)
}

fn write_sequence(out: &mut impl Write, seq: &TelemetrySequence, json: bool) -> eyre::Result<()> {
    if json {
        writeln!(out, "{}", serde_json::to_string(seq)?)?;
    } else {
        for reading in seq {
            writeln!(out, "{reading}")?;
        }
    }
    Ok(())
}

pub fn show(
    source: &mut dyn PropertySource,
    json: bool,
    explain: bool,
    out: &mut impl Write,
    diag: &mut impl Write,
) -> eyre::Result<()> {
    let assembly = poll_with_report(source);
    write_sequence(out, &assembly.readings, json)?;
    if explain {
        for (label, reason) in &assembly.omitted {
            writeln!(diag, "omitted: {label} ({reason})")?;
        }
    }
    Ok(())
}

/// The export text, exactly. Written verbatim to `--out`; stdout gets a
/// trailing newline when there is anything to print.
pub fn export(
    source: &mut dyn PropertySource,
    out_path: Option<&Path>,
    strict: bool,
    out: &mut impl Write,
) -> eyre::Result<()> {
    let seq = if strict {
        try_poll(source)?.readings
    } else {
        poll(source)
    };
    let text = seq.to_export_text();
    match out_path {
        Some(path) => {
            std::fs::write(path, &text)
                .map_err(|e| eyre::eyre!("write export {}: {e}", path.display()))?;
            tracing::info!(path = %path.display(), readings = seq.len(), "export written");
        }
        None if text.is_empty() => {}
        None => writeln!(out, "{text}")?,
    }
    Ok(())
}

pub struct WatchOpts {
    pub interval: Duration,
    /// 0 = until shutdown
    pub count: u64,
    pub json: bool,
}

/// Poll every `interval` until `count` polls are done or `shutdown` is set.
/// Returns the number of polls taken.
pub fn watch(
    source: &mut dyn PropertySource,
    clock: &impl Clock,
    opts: &WatchOpts,
    shutdown: &Arc<AtomicBool>,
    out: &mut impl Write,
) -> eyre::Result<u64> {
    let mut polls = 0u64;
    while !shutdown.load(Ordering::Relaxed) {
        let started = clock.now();
        let seq = poll(source);
        if polls > 0 && !opts.json {
            writeln!(out)?;
        }
        write_sequence(out, &seq, opts.json)?;
        out.flush()?;
        polls += 1;
        if opts.count != 0 && polls >= opts.count {
            break;
        }
        // Sleep out the period in slices, checking for Ctrl-C between them.
        loop {
            if shutdown.load(Ordering::Relaxed) {
                tracing::info!(polls, "watch interrupted");
                return Ok(polls);
            }
            let left = clock.remaining(started, opts.interval);
            if left.is_zero() {
                break;
            }
            clock.sleep(left.min(SHUTDOWN_SLICE));
        }
    }
    Ok(polls)
}

/// Labels the simulated battery must produce, in order.
const SELF_CHECK_LABELS: [Label; 23] = [
    Label::CurrentCapacity,
    Label::MaxCapacity,
    Label::DesignCapacity,
    Label::CycleCount,
    Label::MaxDischargeCurrent,
    Label::Temperature,
    Label::Voltage,
    Label::Amperage,
    Label::Power,
    Label::Charging,
    Label::FullyCharged,
    Label::ChargePercent,
    Label::BatteryHealth,
    Label::Temperature,
    Label::BatteryId,
    Label::SerialNumber,
    Label::AdapterWattage,
    Label::AdapterName,
    Label::AdapterVoltage,
    Label::AdapterCurrent,
    Label::AdapterSerial,
    Label::AdapterManufacturer,
    Label::AcAdapterConnected,
];

pub fn self_check() -> eyre::Result<()> {
    let seq = assemble(&battinfo_hardware::typical_bag());
    let labels: Vec<Label> = seq.labels().collect();
    if labels != SELF_CHECK_LABELS {
        eyre::bail!(
            "self-check failed: expected {} readings, got {} ({})",
            SELF_CHECK_LABELS.len(),
            labels.len(),
            labels
                .iter()
                .map(|l| l.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }
    // Empty input must yield empty output.
    if !assemble(&battinfo_traits::RawPropertyBag::new()).is_empty() {
        eyre::bail!("self-check failed: empty snapshot produced readings");
    }
    tracing::info!(readings = seq.len(), "self-check passed");
    Ok(())
}
