#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Whatever the tool prints, parsing and assembly must not panic.
    let bag = battinfo_hardware::ioreg::parse_ioreg(data);
    let seq = battinfo_core::assemble(&bag);
    assert!(seq.len() <= battinfo_core::EMISSION_ORDER.len());
});
