//! Heuristic decoder for the manufacturer data blob.
//!
//! The blob layout is undocumented. It appears to embed short ASCII strings,
//! each preceded by a one-byte length in `1..20`. The scanner walks the bytes
//! once, left to right:
//!
//! - a length byte with enough bytes after it yields a field and the cursor
//!   jumps past the field;
//! - a length byte whose field would run off the end is skipped on its own;
//! - every other byte (0, or 20 and above) is skipped on its own.
//!
//! A field is kept only when it is pure ASCII and non-empty after trimming.

/// Separator between recovered fields in the battery identifier.
pub const ID_SEPARATOR: &str = "-";

const MIN_LEN: u8 = 1;
const MAX_LEN_EXCLUSIVE: u8 = 20;

/// Iterator over the ASCII fields recovered from a manufacturer blob.
#[derive(Debug, Clone)]
pub struct AsciiFields<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> AsciiFields<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    /// Try to read a length-prefixed field at the cursor. Returns the field
    /// bytes and advances past them, or `None` without moving.
    fn take_prefixed(&mut self) -> Option<&'a [u8]> {
        let len = self.bytes.len();
        if self.pos + 1 >= len {
            return None;
        }
        let n = self.bytes[self.pos];
        if !(MIN_LEN..MAX_LEN_EXCLUSIVE).contains(&n) {
            return None;
        }
        let n = usize::from(n);
        if self.pos + n >= len {
            return None;
        }
        let start = self.pos + 1;
        self.pos = start + n;
        Some(&self.bytes[start..start + n])
    }
}

fn ascii_field(raw: &[u8]) -> Option<String> {
    if !raw.is_ascii() {
        return None;
    }
    let text = std::str::from_utf8(raw).ok()?.trim();
    (!text.is_empty()).then(|| text.to_string())
}

impl Iterator for AsciiFields<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        while self.pos < self.bytes.len() {
            match self.take_prefixed() {
                Some(raw) => {
                    if let Some(field) = ascii_field(raw) {
                        return Some(field);
                    }
                }
                None => self.pos += 1,
            }
        }
        None
    }
}

/// All fields recovered from `bytes`, in order.
pub fn decode_fields(bytes: &[u8]) -> Vec<String> {
    AsciiFields::new(bytes).collect()
}

/// Battery identifier: recovered fields joined with `-`, or `None` if the
/// blob held nothing usable.
pub fn battery_id(bytes: &[u8]) -> Option<String> {
    let fields = decode_fields(bytes);
    if fields.is_empty() {
        return None;
    }
    Some(fields.join(ID_SEPARATOR))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn two_prefixed_fields() {
        let blob = [3, b'A', b'B', b'C', 2, b'X', b'Y'];
        assert_eq!(decode_fields(&blob), ["ABC", "XY"]);
        assert_eq!(battery_id(&blob).as_deref(), Some("ABC-XY"));
    }

    #[test]
    fn truncated_prefix_is_skipped_then_scan_continues() {
        // 5 claims more bytes than remain; 'A' and 'B' are >= 20 and skipped.
        assert_eq!(decode_fields(&[5, b'A', b'B']), Vec::<String>::new());
        assert_eq!(battery_id(&[5, b'A', b'B']), None);

        // cursor moves by one past the bad prefix and finds the next field
        let blob = [9, 2, b'O', b'K'];
        assert_eq!(decode_fields(&blob), ["OK"]);
    }

    #[test]
    fn prefix_in_last_position_is_ignored() {
        assert_eq!(decode_fields(&[b'Z', 1]), Vec::<String>::new());
    }

    #[test]
    fn zero_and_large_bytes_are_not_prefixes() {
        let blob = [0, 20, 255, 2, b'h', b'i'];
        assert_eq!(decode_fields(&blob), ["hi"]);
    }

    #[test]
    fn blank_and_non_ascii_fields_are_dropped_but_consumed() {
        // The blank field swallows its bytes; so does the non-ASCII one.
        let blob = [2, b' ', b' ', 2, 0xC3, 0xA9, 3, b'B', b'A', b'T'];
        assert_eq!(decode_fields(&blob), ["BAT"]);
    }

    #[test]
    fn fields_are_trimmed() {
        let blob = [5, b' ', b'S', b'M', b'P', b' '];
        assert_eq!(battery_id(&blob).as_deref(), Some("SMP"));
    }

    #[test]
    fn prefix_consumes_following_length_bytes() {
        // The 2 inside the first field is data, not a new prefix.
        let blob = [3, b'a', 2, b'b', 1, b'c'];
        assert_eq!(decode_fields(&blob), ["a\u{2}b", "c"]);
    }

    #[test]
    fn empty_blob() {
        assert_eq!(battery_id(&[]), None);
    }

    proptest! {
        #[test]
        fn never_panics_and_fields_are_clean(blob in proptest::collection::vec(any::<u8>(), 0..256)) {
            for field in decode_fields(&blob) {
                prop_assert!(!field.is_empty());
                prop_assert!(field.is_ascii());
                prop_assert!(field.len() < 20);
                prop_assert_eq!(field.trim(), field.as_str());
            }
        }

        #[test]
        fn id_is_none_exactly_when_no_fields(blob in proptest::collection::vec(any::<u8>(), 0..64)) {
            prop_assert_eq!(battery_id(&blob).is_none(), decode_fields(&blob).is_empty());
        }
    }
}
