use battinfo_core::{Label, TelemetrySequence, assemble};
use battinfo_traits::RawPropertyBag;
use rstest::rstest;

fn lines(seq: &TelemetrySequence) -> Vec<String> {
    seq.iter().map(ToString::to_string).collect()
}

fn value(bag: &RawPropertyBag, label: Label) -> Option<String> {
    assemble(bag).get(label).map(str::to_string)
}

#[test]
fn typical_battery_full_sequence() {
    let seq = assemble(&battinfo_hardware::typical_bag());
    assert_eq!(
        lines(&seq),
        [
            "Current Capacity: 3184 mAh",
            "Max Capacity: 4420 mAh",
            "Design Capacity: 4563 mAh",
            "Cycle Count: 187",
            "Max Discharge Current: 6120 mA",
            "Temperature: 30.5°C / 87.0°F",
            "Voltage: 12.48 V",
            "Amperage: +2150 mA",
            "Power: +26.83 W",
            "Charging: Yes",
            "Fully Charged: No",
            "Charge %: 72.0%",
            "Battery Health: 96.9%",
            "Temperature: 30.5°C / 87.0°F",
            "Battery ID: 341-DSY2-A01234",
            "Serial Number: F8Y2451A0B1Q9KNAX",
            "Adapter Wattage: 96 W",
            "Adapter Name: 96W USB-C Power Adapter",
            "Adapter Voltage: 20.00 V",
            "Adapter Current: 4800 mA",
            "Adapter Serial: C4H1234ABCD",
            "Adapter Manufacturer: Apple Inc.",
            "AC Adapter Connected: Yes",
        ]
    );
}

#[test]
fn assembling_twice_is_identical() {
    let bag = battinfo_hardware::typical_bag();
    let before = bag.clone();
    assert_eq!(assemble(&bag), assemble(&bag));
    assert_eq!(bag, before, "bag must not be mutated");
}

#[test]
fn empty_bag_yields_empty_sequence() {
    let seq = assemble(&RawPropertyBag::new());
    assert!(seq.is_empty());
    assert_eq!(seq.to_export_text(), "");
}

#[test]
fn health_uses_raw_max_over_design() {
    let bag = RawPropertyBag::new()
        .with("AppleRawMaxCapacity", 4_000i64)
        .with("MaxCapacity", 100i64)
        .with("DesignCapacity", 5_000i64);
    assert_eq!(value(&bag, Label::BatteryHealth).as_deref(), Some("80.0%"));
}

#[rstest]
#[case(0)]
#[case(-10)]
fn health_guard_omits_reading(#[case] design: i64) {
    let mut bag = battinfo_hardware::typical_bag();
    bag.insert("DesignCapacity", design);
    let seq = assemble(&bag);
    assert!(seq.get(Label::BatteryHealth).is_none());
    // Everything else still comes through.
    assert!(seq.get(Label::ChargePercent).is_some());
    assert_eq!(seq.len(), 22);
}

#[test]
fn charge_formula() {
    let bag = RawPropertyBag::new()
        .with("AppleRawCurrentCapacity", 2_500i64)
        .with("AppleRawMaxCapacity", 5_000i64);
    assert_eq!(value(&bag, Label::ChargePercent).as_deref(), Some("50.0%"));
}

#[test]
fn charge_guard_on_zero_max() {
    let bag = RawPropertyBag::new()
        .with("AppleRawCurrentCapacity", 2_500i64)
        .with("AppleRawMaxCapacity", 0i64);
    assert!(value(&bag, Label::ChargePercent).is_none());
}

#[test]
fn charge_needs_both_capacities() {
    let bag = RawPropertyBag::new().with("AppleRawCurrentCapacity", 2_500i64);
    assert!(value(&bag, Label::ChargePercent).is_none());
}

#[rstest]
#[case(-500, "Amperage: -500 mA")]
#[case(0, "Amperage: 0 mA")]
#[case(300, "Amperage: +300 mA")]
fn amperage_sign(#[case] ma: i64, #[case] want: &str) {
    let bag = RawPropertyBag::new().with("InstantAmperage", ma);
    assert_eq!(lines(&assemble(&bag)), [want]);
}

#[test]
fn instant_amperage_beats_generic() {
    let bag = RawPropertyBag::new()
        .with("InstantAmperage", -873i64)
        .with("Amperage", -900i64);
    assert_eq!(value(&bag, Label::Amperage).as_deref(), Some("-873 mA"));
}

#[rstest]
#[case(None)]
#[case(Some(0))]
fn power_zero_path(#[case] ma: Option<i64>) {
    let mut bag = RawPropertyBag::new().with("Voltage", 12_000i64);
    if let Some(ma) = ma {
        bag.insert("InstantAmperage", ma);
    }
    assert_eq!(value(&bag, Label::Power).as_deref(), Some("0.00 W"));
}

#[test]
fn power_needs_voltage() {
    let bag = RawPropertyBag::new().with("InstantAmperage", 1_000i64);
    assert!(value(&bag, Label::Power).is_none());
}

#[test]
fn negative_power_is_unsigned_magnitude() {
    let bag = RawPropertyBag::new()
        .with("Voltage", 12_000i64)
        .with("InstantAmperage", -1_500i64);
    assert_eq!(value(&bag, Label::Power).as_deref(), Some("18.00 W"));
}

#[test]
fn blob_decode() {
    let blob: Vec<u8> = vec![3, b'A', b'B', b'C', 2, b'X', b'Y'];
    let bag = RawPropertyBag::new().with("ManufacturerData", blob);
    assert_eq!(lines(&assemble(&bag)), ["Battery ID: ABC-XY"]);
}

#[test]
fn blob_truncated_prefix_is_omitted() {
    let blob: Vec<u8> = vec![5, b'A', b'B'];
    let bag = RawPropertyBag::new().with("ManufacturerData", blob);
    assert!(assemble(&bag).is_empty());
}

#[test]
fn temperature_formatting_and_duplicate() {
    let bag = RawPropertyBag::new().with("Temperature", 2_500i64);
    assert_eq!(
        lines(&assemble(&bag)),
        ["Temperature: 25.0°C / 77.0°F", "Temperature: 25.0°C / 77.0°F"]
    );
}

#[test]
fn wrong_kind_is_treated_as_missing() {
    let bag = RawPropertyBag::new()
        .with("CycleCount", "187")
        .with("IsCharging", 1i64)
        .with("Serial", 42i64)
        .with("AdapterDetails", "96W");
    assert!(assemble(&bag).is_empty());
}

#[test]
fn adapter_fields_are_independent() {
    let adapter = RawPropertyBag::new()
        .with("Name", "Charger")
        .with("Watts", "sixty");
    let bag = RawPropertyBag::new().with("AdapterDetails", adapter);
    assert_eq!(lines(&assemble(&bag)), ["Adapter Name: Charger"]);
}

#[test]
fn export_text_joins_lines() {
    let bag = RawPropertyBag::new()
        .with("CycleCount", 5i64)
        .with("ExternalConnected", false);
    assert_eq!(
        assemble(&bag).to_export_text(),
        "Cycle Count: 5\nAC Adapter Connected: No"
    );
}
