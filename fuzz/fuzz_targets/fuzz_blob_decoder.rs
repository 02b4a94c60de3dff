#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let fields = battinfo_core::blob::decode_fields(data);
    for f in &fields {
        assert!(!f.is_empty() && f.is_ascii() && f.len() < 20);
    }
    let id = battinfo_core::blob::battery_id(data);
    assert_eq!(id.is_some(), !fields.is_empty());
});
