use std::time::{Duration, Instant};

/// Call `probe` until it yields `Some`, or a timeout expires.
/// Sleeps in small intervals between probes to avoid CPU spinning.
///
/// Returns `Ok(None)` when the deadline passes first; probe errors are
/// returned as-is.
pub fn poll_until_some<T>(
    mut probe: impl FnMut() -> std::io::Result<Option<T>>,
    timeout: Duration,
    poll_interval: Duration,
) -> std::io::Result<Option<T>> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(v) = probe()? {
            return Ok(Some(v));
        }
        if Instant::now() >= deadline {
            return Ok(None);
        }
        std::thread::sleep(poll_interval);
    }
}
