//! Output types: labeled readings and the ordered sequence of one poll.

use serde::{Serialize, Serializer};

/// The closed vocabulary of reading labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    CurrentCapacity,
    MaxCapacity,
    DesignCapacity,
    CycleCount,
    MaxDischargeCurrent,
    Temperature,
    Voltage,
    Amperage,
    Power,
    Charging,
    FullyCharged,
    ChargePercent,
    BatteryHealth,
    BatteryId,
    SerialNumber,
    AdapterWattage,
    AdapterName,
    AdapterVoltage,
    AdapterCurrent,
    AdapterSerial,
    AdapterManufacturer,
    AcAdapterConnected,
}

impl Label {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CurrentCapacity => "Current Capacity",
            Self::MaxCapacity => "Max Capacity",
            Self::DesignCapacity => "Design Capacity",
            Self::CycleCount => "Cycle Count",
            Self::MaxDischargeCurrent => "Max Discharge Current",
            Self::Temperature => "Temperature",
            Self::Voltage => "Voltage",
            Self::Amperage => "Amperage",
            Self::Power => "Power",
            Self::Charging => "Charging",
            Self::FullyCharged => "Fully Charged",
            Self::ChargePercent => "Charge %",
            Self::BatteryHealth => "Battery Health",
            Self::BatteryId => "Battery ID",
            Self::SerialNumber => "Serial Number",
            Self::AdapterWattage => "Adapter Wattage",
            Self::AdapterName => "Adapter Name",
            Self::AdapterVoltage => "Adapter Voltage",
            Self::AdapterCurrent => "Adapter Current",
            Self::AdapterSerial => "Adapter Serial",
            Self::AdapterManufacturer => "Adapter Manufacturer",
            Self::AcAdapterConnected => "AC Adapter Connected",
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Label {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A single labeled, display-ready value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TelemetryReading {
    pub label: Label,
    pub value: String,
}

impl TelemetryReading {
    pub fn new(label: Label, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
        }
    }
}

impl std::fmt::Display for TelemetryReading {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.label, self.value)
    }
}

/// Readings of one poll, in emission order. Serializes as a JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TelemetrySequence(Vec<TelemetryReading>);

impl TelemetrySequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, reading: TelemetryReading) {
        self.0.push(reading);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TelemetryReading> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[TelemetryReading] {
        &self.0
    }

    /// Value of the first reading carrying `label`.
    pub fn get(&self, label: Label) -> Option<&str> {
        self.0
            .iter()
            .find(|r| r.label == label)
            .map(|r| r.value.as_str())
    }

    pub fn labels(&self) -> impl Iterator<Item = Label> + '_ {
        self.0.iter().map(|r| r.label)
    }

    /// `label: value` lines joined by `\n`, no trailing newline.
    pub fn to_export_text(&self) -> String {
        self.0
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl<'a> IntoIterator for &'a TelemetrySequence {
    type Item = &'a TelemetryReading;
    type IntoIter = std::slice::Iter<'a, TelemetryReading>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for TelemetrySequence {
    type Item = TelemetryReading;
    type IntoIter = std::vec::IntoIter<TelemetryReading>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
