//! Fallback resolution of logical metrics onto vendor keys.
//!
//! Each metric owns an ordered chain of [`Candidate`]s. The first candidate that
//! is present with the expected kind wins; order is precedence, so raw vendor
//! capacity fields are listed ahead of the generic calibrated ones.

use battinfo_traits::RawPropertyBag;

use crate::accessor::{self, TypedValue, ValueKind};
use crate::error::Omission;
use ValueKind::{Boolean, Bytes, Integer, Text};
use keys::*;

/// Registry key names as published by the smart-battery driver.
pub mod keys {
    pub const RAW_CURRENT_CAPACITY: &str = "AppleRawCurrentCapacity";
    pub const ABSOLUTE_CAPACITY: &str = "AbsoluteCapacity";
    pub const CURRENT_CAPACITY: &str = "CurrentCapacity";
    pub const RAW_MAX_CAPACITY: &str = "AppleRawMaxCapacity";
    pub const MAX_CAPACITY: &str = "MaxCapacity";
    pub const DESIGN_CAPACITY: &str = "DesignCapacity";
    pub const CYCLE_COUNT: &str = "CycleCount";
    pub const LIFETIME_DATA: &str = "LifetimeData";
    pub const MAX_DISCHARGE_CURRENT: &str = "MaximumDischargeCurrent";
    pub const TEMPERATURE: &str = "Temperature";
    pub const VOLTAGE: &str = "Voltage";
    pub const INSTANT_AMPERAGE: &str = "InstantAmperage";
    pub const AMPERAGE: &str = "Amperage";
    pub const IS_CHARGING: &str = "IsCharging";
    pub const FULLY_CHARGED: &str = "FullyCharged";
    pub const MANUFACTURER_DATA: &str = "ManufacturerData";
    pub const SERIAL: &str = "Serial";
    pub const ADAPTER_DETAILS: &str = "AdapterDetails";
    pub const ADAPTER_WATTS: &str = "Watts";
    pub const ADAPTER_NAME: &str = "Name";
    pub const ADAPTER_VOLTAGE: &str = "AdapterVoltage";
    pub const ADAPTER_CURRENT: &str = "Current";
    pub const ADAPTER_SERIAL: &str = "SerialString";
    pub const ADAPTER_MANUFACTURER: &str = "Manufacturer";
    pub const EXTERNAL_CONNECTED: &str = "ExternalConnected";
}

/// One place a metric may live: a top-level key, or a key inside a nested
/// mapping one level down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub parent: Option<&'static str>,
    pub key: &'static str,
    pub kind: ValueKind,
}

impl Candidate {
    pub const fn top(key: &'static str, kind: ValueKind) -> Self {
        Self {
            parent: None,
            key,
            kind,
        }
    }

    pub const fn nested(parent: &'static str, key: &'static str, kind: ValueKind) -> Self {
        Self {
            parent: Some(parent),
            key,
            kind,
        }
    }

    fn lookup<'a>(&self, bag: &'a RawPropertyBag) -> Result<TypedValue<'a>, Omission> {
        let scope = match self.parent {
            None => bag,
            Some(parent) => accessor::lookup(bag, parent, ValueKind::Mapping)?
                .as_mapping()
                .ok_or(Omission::TypeMismatch)?,
        };
        accessor::lookup(scope, self.key, self.kind)
    }
}

pub const CURRENT_CAPACITY_CHAIN: &[Candidate] = &[
    Candidate::top(RAW_CURRENT_CAPACITY, Integer),
    Candidate::top(ABSOLUTE_CAPACITY, Integer),
    Candidate::top(CURRENT_CAPACITY, Integer),
];
pub const MAX_CAPACITY_CHAIN: &[Candidate] = &[
    Candidate::top(RAW_MAX_CAPACITY, Integer),
    Candidate::top(MAX_CAPACITY, Integer),
];
pub const DESIGN_CAPACITY_CHAIN: &[Candidate] = &[Candidate::top(DESIGN_CAPACITY, Integer)];
pub const CYCLE_COUNT_CHAIN: &[Candidate] = &[Candidate::top(CYCLE_COUNT, Integer)];
pub const MAX_DISCHARGE_CURRENT_CHAIN: &[Candidate] =
    &[Candidate::nested(LIFETIME_DATA, MAX_DISCHARGE_CURRENT, Integer)];
pub const TEMPERATURE_CHAIN: &[Candidate] = &[Candidate::top(TEMPERATURE, Integer)];
pub const VOLTAGE_CHAIN: &[Candidate] = &[Candidate::top(VOLTAGE, Integer)];
pub const AMPERAGE_CHAIN: &[Candidate] = &[
    Candidate::top(INSTANT_AMPERAGE, Integer),
    Candidate::top(AMPERAGE, Integer),
];
pub const CHARGING_CHAIN: &[Candidate] = &[Candidate::top(IS_CHARGING, Boolean)];
pub const FULLY_CHARGED_CHAIN: &[Candidate] = &[Candidate::top(FULLY_CHARGED, Boolean)];
pub const MANUFACTURER_DATA_CHAIN: &[Candidate] = &[Candidate::top(MANUFACTURER_DATA, Bytes)];
pub const SERIAL_CHAIN: &[Candidate] = &[Candidate::top(SERIAL, Text)];
pub const ADAPTER_WATTS_CHAIN: &[Candidate] =
    &[Candidate::nested(ADAPTER_DETAILS, ADAPTER_WATTS, Integer)];
pub const ADAPTER_NAME_CHAIN: &[Candidate] =
    &[Candidate::nested(ADAPTER_DETAILS, ADAPTER_NAME, Text)];
pub const ADAPTER_VOLTAGE_CHAIN: &[Candidate] =
    &[Candidate::nested(ADAPTER_DETAILS, ADAPTER_VOLTAGE, Integer)];
pub const ADAPTER_CURRENT_CHAIN: &[Candidate] =
    &[Candidate::nested(ADAPTER_DETAILS, ADAPTER_CURRENT, Integer)];
pub const ADAPTER_SERIAL_CHAIN: &[Candidate] =
    &[Candidate::nested(ADAPTER_DETAILS, ADAPTER_SERIAL, Text)];
pub const ADAPTER_MANUFACTURER_CHAIN: &[Candidate] =
    &[Candidate::nested(ADAPTER_DETAILS, ADAPTER_MANUFACTURER, Text)];
pub const EXTERNAL_CONNECTED_CHAIN: &[Candidate] =
    &[Candidate::top(EXTERNAL_CONNECTED, Boolean)];

/// Like [`resolve`], but reports why the chain came up empty.
///
/// `TypeMismatch` wins over `MissingField` when at least one candidate was
/// present with the wrong kind.
pub fn resolve_detailed<'a>(
    bag: &'a RawPropertyBag,
    chain: &[Candidate],
) -> Result<TypedValue<'a>, Omission> {
    let mut reason = Omission::MissingField;
    for candidate in chain {
        match candidate.lookup(bag) {
            Ok(v) => return Ok(v),
            Err(Omission::TypeMismatch) => reason = Omission::TypeMismatch,
            Err(_) => {}
        }
    }
    Err(reason)
}

/// First candidate in `chain` present in `bag` with its expected kind.
#[inline]
pub fn resolve<'a>(bag: &'a RawPropertyBag, chain: &[Candidate]) -> Option<TypedValue<'a>> {
    resolve_detailed(bag, chain).ok()
}
