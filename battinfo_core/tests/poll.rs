use battinfo_core::{EngineError, Label, Omission, poll, poll_with_report, try_poll};
use battinfo_hardware::SimulatedSource;
use battinfo_traits::{PropertySource, RawPropertyBag};

/// Counts snapshots to show each poll takes exactly one.
struct CountingSource {
    inner: SimulatedSource,
    calls: usize,
}

impl PropertySource for CountingSource {
    fn snapshot(&mut self) -> Result<RawPropertyBag, Box<dyn std::error::Error + Send + Sync>> {
        self.calls += 1;
        self.inner.snapshot()
    }
}

#[test]
fn poll_takes_one_snapshot() {
    let mut src = CountingSource {
        inner: SimulatedSource::typical(),
        calls: 0,
    };
    let seq = poll(&mut src);
    assert_eq!(src.calls, 1);
    assert_eq!(seq.len(), 23);
}

#[test]
fn unavailable_source_yields_empty_sequence() {
    let mut src = SimulatedSource::failing();
    assert!(poll(&mut src).is_empty());
}

#[test]
fn unavailable_source_reports_every_label() {
    let mut src = SimulatedSource::failing();
    let assembly = poll_with_report(&mut src);
    assert!(assembly.readings.is_empty());
    assert_eq!(assembly.omitted.len(), battinfo_core::EMISSION_ORDER.len());
    assert!(
        assembly
            .omitted
            .iter()
            .all(|(_, r)| *r == Omission::SourceUnavailable)
    );
}

#[test]
fn try_poll_surfaces_failure() {
    let mut src = SimulatedSource::failing();
    let err = try_poll(&mut src).unwrap_err();
    assert!(matches!(err, EngineError::SourceUnavailable(_)), "{err:?}");
}

#[test]
fn dyn_source_can_be_polled() {
    let mut boxed: Box<dyn PropertySource> = Box::new(SimulatedSource::typical());
    let seq = poll(&mut *boxed);
    assert_eq!(seq.get(Label::CycleCount), Some("187"));
}

#[test]
fn report_explains_partial_bag() {
    let bag = RawPropertyBag::new()
        .with("AppleRawMaxCapacity", 4_000i64)
        .with("DesignCapacity", 0i64)
        .with("CycleCount", "many");
    let mut src = SimulatedSource::new(bag);
    let assembly = poll_with_report(&mut src);
    let reason = |label: Label| {
        assembly
            .omitted
            .iter()
            .find(|(l, _)| *l == label)
            .map(|(_, r)| *r)
    };
    assert_eq!(reason(Label::BatteryHealth), Some(Omission::GuardFailure));
    assert_eq!(reason(Label::CycleCount), Some(Omission::TypeMismatch));
    assert_eq!(reason(Label::Voltage), Some(Omission::MissingField));
    assert_eq!(reason(Label::MaxCapacity), None);
}
