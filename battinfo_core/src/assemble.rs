//! Telemetry assembler.
//!
//! Resolves every raw input once, then walks [`EMISSION_ORDER`] and appends a
//! reading for each step that produces one. The table is the single source of
//! truth for output order; Temperature appears in it twice on purpose.

use battinfo_traits::RawPropertyBag;

use crate::accessor::TypedValue;
use crate::blob;
use crate::derive;
use crate::error::Omission;
use crate::reading::{Label, TelemetryReading, TelemetrySequence};
use crate::resolve::{self, Candidate};
use crate::units;

type Lookup<T> = Result<T, Omission>;

/// Every raw input the emission table reads, resolved in one pass.
#[derive(Debug, Clone)]
pub struct Resolved<'a> {
    current_capacity: Lookup<i64>,
    max_capacity: Lookup<i64>,
    design_capacity: Lookup<i64>,
    cycle_count: Lookup<i64>,
    max_discharge_current: Lookup<i64>,
    temperature: Lookup<i64>,
    voltage: Lookup<i64>,
    amperage: Lookup<i64>,
    charging: Lookup<bool>,
    fully_charged: Lookup<bool>,
    manufacturer_data: Lookup<&'a [u8]>,
    serial: Lookup<&'a str>,
    adapter_watts: Lookup<i64>,
    adapter_name: Lookup<&'a str>,
    adapter_voltage: Lookup<i64>,
    adapter_current: Lookup<i64>,
    adapter_serial: Lookup<&'a str>,
    adapter_manufacturer: Lookup<&'a str>,
    external_connected: Lookup<bool>,
}

fn pick<'a, T>(
    bag: &'a RawPropertyBag,
    chain: &[Candidate],
    narrow: fn(TypedValue<'a>) -> Option<T>,
) -> Lookup<T> {
    resolve::resolve_detailed(bag, chain).and_then(|v| narrow(v).ok_or(Omission::TypeMismatch))
}

impl<'a> Resolved<'a> {
    pub fn from_bag(bag: &'a RawPropertyBag) -> Self {
        let int = TypedValue::as_integer;
        let text = TypedValue::as_text;
        let flag = TypedValue::as_bool;
        Self {
            current_capacity: pick(bag, resolve::CURRENT_CAPACITY_CHAIN, int),
            max_capacity: pick(bag, resolve::MAX_CAPACITY_CHAIN, int),
            design_capacity: pick(bag, resolve::DESIGN_CAPACITY_CHAIN, int),
            cycle_count: pick(bag, resolve::CYCLE_COUNT_CHAIN, int),
            max_discharge_current: pick(bag, resolve::MAX_DISCHARGE_CURRENT_CHAIN, int),
            temperature: pick(bag, resolve::TEMPERATURE_CHAIN, int),
            voltage: pick(bag, resolve::VOLTAGE_CHAIN, int),
            amperage: pick(bag, resolve::AMPERAGE_CHAIN, int),
            charging: pick(bag, resolve::CHARGING_CHAIN, flag),
            fully_charged: pick(bag, resolve::FULLY_CHARGED_CHAIN, flag),
            manufacturer_data: pick(bag, resolve::MANUFACTURER_DATA_CHAIN, TypedValue::as_bytes),
            serial: pick(bag, resolve::SERIAL_CHAIN, text),
            adapter_watts: pick(bag, resolve::ADAPTER_WATTS_CHAIN, int),
            adapter_name: pick(bag, resolve::ADAPTER_NAME_CHAIN, text),
            adapter_voltage: pick(bag, resolve::ADAPTER_VOLTAGE_CHAIN, int),
            adapter_current: pick(bag, resolve::ADAPTER_CURRENT_CHAIN, int),
            adapter_serial: pick(bag, resolve::ADAPTER_SERIAL_CHAIN, text),
            adapter_manufacturer: pick(bag, resolve::ADAPTER_MANUFACTURER_CHAIN, text),
            external_connected: pick(bag, resolve::EXTERNAL_CONNECTED_CHAIN, flag),
        }
    }
}

/// One row of the emission table.
#[derive(Clone, Copy)]
pub struct Step {
    pub label: Label,
    emit: fn(&Resolved<'_>) -> Lookup<String>,
}

impl std::fmt::Debug for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Step").field("label", &self.label).finish()
    }
}

fn current_capacity(r: &Resolved<'_>) -> Lookup<String> {
    r.current_capacity.map(units::milliamp_hours)
}

fn max_capacity(r: &Resolved<'_>) -> Lookup<String> {
    r.max_capacity.map(units::milliamp_hours)
}

fn design_capacity(r: &Resolved<'_>) -> Lookup<String> {
    r.design_capacity.map(units::milliamp_hours)
}

fn cycle_count(r: &Resolved<'_>) -> Lookup<String> {
    r.cycle_count.map(|n| n.to_string())
}

fn max_discharge_current(r: &Resolved<'_>) -> Lookup<String> {
    r.max_discharge_current.map(units::milliamps)
}

fn temperature(r: &Resolved<'_>) -> Lookup<String> {
    r.temperature.map(units::temperature)
}

fn voltage(r: &Resolved<'_>) -> Lookup<String> {
    r.voltage.map(units::voltage)
}

fn amperage(r: &Resolved<'_>) -> Lookup<String> {
    r.amperage.map(units::amperage)
}

fn power(r: &Resolved<'_>) -> Lookup<String> {
    let mv = r.voltage?;
    Ok(derive::power(mv, r.amperage.ok()))
}

fn charging(r: &Resolved<'_>) -> Lookup<String> {
    r.charging.map(units::flag)
}

fn fully_charged(r: &Resolved<'_>) -> Lookup<String> {
    r.fully_charged.map(units::flag)
}

fn charge_percent(r: &Resolved<'_>) -> Lookup<String> {
    derive::charge_percent(r.current_capacity?, r.max_capacity?)
}

fn battery_health(r: &Resolved<'_>) -> Lookup<String> {
    derive::health_percent(r.max_capacity?, r.design_capacity?)
}

fn battery_id(r: &Resolved<'_>) -> Lookup<String> {
    blob::battery_id(r.manufacturer_data?).ok_or(Omission::BlobDecodeEmpty)
}

fn serial_number(r: &Resolved<'_>) -> Lookup<String> {
    r.serial.map(str::to_string)
}

fn adapter_wattage(r: &Resolved<'_>) -> Lookup<String> {
    r.adapter_watts.map(units::watts)
}

fn adapter_name(r: &Resolved<'_>) -> Lookup<String> {
    r.adapter_name.map(str::to_string)
}

fn adapter_voltage(r: &Resolved<'_>) -> Lookup<String> {
    r.adapter_voltage.map(units::voltage)
}

fn adapter_current(r: &Resolved<'_>) -> Lookup<String> {
    r.adapter_current.map(units::milliamps)
}

fn adapter_serial(r: &Resolved<'_>) -> Lookup<String> {
    r.adapter_serial.map(str::to_string)
}

fn adapter_manufacturer(r: &Resolved<'_>) -> Lookup<String> {
    r.adapter_manufacturer.map(str::to_string)
}

fn ac_adapter_connected(r: &Resolved<'_>) -> Lookup<String> {
    r.external_connected.map(units::flag)
}

const fn step(label: Label, emit: fn(&Resolved<'_>) -> Lookup<String>) -> Step {
    Step { label, emit }
}

/// Output order of one poll.
pub static EMISSION_ORDER: &[Step] = &[
    step(Label::CurrentCapacity, current_capacity),
    step(Label::MaxCapacity, max_capacity),
    step(Label::DesignCapacity, design_capacity),
    step(Label::CycleCount, cycle_count),
    step(Label::MaxDischargeCurrent, max_discharge_current),
    step(Label::Temperature, temperature),
    step(Label::Voltage, voltage),
    step(Label::Amperage, amperage),
    step(Label::Power, power),
    step(Label::Charging, charging),
    step(Label::FullyCharged, fully_charged),
    step(Label::ChargePercent, charge_percent),
    step(Label::BatteryHealth, battery_health),
    step(Label::Temperature, temperature),
    step(Label::BatteryId, battery_id),
    step(Label::SerialNumber, serial_number),
    step(Label::AdapterWattage, adapter_wattage),
    step(Label::AdapterName, adapter_name),
    step(Label::AdapterVoltage, adapter_voltage),
    step(Label::AdapterCurrent, adapter_current),
    step(Label::AdapterSerial, adapter_serial),
    step(Label::AdapterManufacturer, adapter_manufacturer),
    step(Label::AcAdapterConnected, ac_adapter_connected),
];

/// Result of one assembly pass, including what was left out and why.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assembly {
    pub readings: TelemetrySequence,
    pub omitted: Vec<(Label, Omission)>,
}

/// Assemble readings and keep the omission report.
pub fn assemble_with_report(bag: &RawPropertyBag) -> Assembly {
    let resolved = Resolved::from_bag(bag);
    let mut out = Assembly::default();
    for step in EMISSION_ORDER {
        match (step.emit)(&resolved) {
            Ok(value) => out.readings.push(TelemetryReading::new(step.label, value)),
            Err(reason) => {
                tracing::trace!(label = %step.label, %reason, "reading omitted");
                out.omitted.push((step.label, reason));
            }
        }
    }
    tracing::debug!(
        properties = bag.len(),
        emitted = out.readings.len(),
        omitted = out.omitted.len(),
        "telemetry assembled"
    );
    out
}

/// Turn one registry snapshot into its ordered reading sequence.
pub fn assemble(bag: &RawPropertyBag) -> TelemetrySequence {
    assemble_with_report(bag).readings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_order_is_fixed() {
        let labels: Vec<&str> = EMISSION_ORDER.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(
            labels,
            [
                "Current Capacity",
                "Max Capacity",
                "Design Capacity",
                "Cycle Count",
                "Max Discharge Current",
                "Temperature",
                "Voltage",
                "Amperage",
                "Power",
                "Charging",
                "Fully Charged",
                "Charge %",
                "Battery Health",
                "Temperature",
                "Battery ID",
                "Serial Number",
                "Adapter Wattage",
                "Adapter Name",
                "Adapter Voltage",
                "Adapter Current",
                "Adapter Serial",
                "Adapter Manufacturer",
                "AC Adapter Connected",
            ]
        );
    }

    #[test]
    fn empty_bag_reports_every_step_missing() {
        let a = assemble_with_report(&RawPropertyBag::new());
        assert!(a.readings.is_empty());
        assert_eq!(a.omitted.len(), EMISSION_ORDER.len());
        assert!(a.omitted.iter().all(|(_, o)| *o == Omission::MissingField));
    }

    #[test]
    fn guard_and_blob_omissions_are_reported() {
        let bag = RawPropertyBag::new()
            .with("AppleRawMaxCapacity", 4000i64)
            .with("DesignCapacity", 0i64)
            .with("ManufacturerData", vec![0u8, 0, 0]);
        let a = assemble_with_report(&bag);
        assert!(a.omitted.contains(&(Label::BatteryHealth, Omission::GuardFailure)));
        assert!(a.omitted.contains(&(Label::BatteryId, Omission::BlobDecodeEmpty)));
        assert!(a.omitted.contains(&(Label::ChargePercent, Omission::MissingField)));
    }

    #[test]
    fn mismatched_type_reported_as_mismatch() {
        let bag = RawPropertyBag::new().with("Voltage", "12000");
        let a = assemble_with_report(&bag);
        assert!(a.omitted.contains(&(Label::Voltage, Omission::TypeMismatch)));
        assert!(a.omitted.contains(&(Label::Power, Omission::TypeMismatch)));
    }
}
