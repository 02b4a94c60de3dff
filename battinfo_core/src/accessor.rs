//! Typed access into a [`RawPropertyBag`].
//!
//! [`get`] narrows one entry to the expected kind. A missing key and a key
//! holding the wrong kind both come back as `None`; [`lookup`] keeps the
//! distinction for diagnostics only.

use battinfo_traits::{RawPropertyBag, RawValue};

use crate::error::Omission;

/// Kind of value a caller expects under a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Integer,
    Boolean,
    Text,
    Bytes,
    Mapping,
}

/// A bag entry narrowed to a known kind. Borrows from the bag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypedValue<'a> {
    Integer(i64),
    Boolean(bool),
    Text(&'a str),
    Bytes(&'a [u8]),
    Mapping(&'a RawPropertyBag),
}

impl<'a> TypedValue<'a> {
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Integer(_) => ValueKind::Integer,
            Self::Boolean(_) => ValueKind::Boolean,
            Self::Text(_) => ValueKind::Text,
            Self::Bytes(_) => ValueKind::Bytes,
            Self::Mapping(_) => ValueKind::Mapping,
        }
    }

    pub fn as_integer(self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bool(self) -> Option<bool> {
        match self {
            Self::Boolean(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_text(self) -> Option<&'a str> {
        match self {
            Self::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bytes(self) -> Option<&'a [u8]> {
        match self {
            Self::Bytes(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_mapping(self) -> Option<&'a RawPropertyBag> {
        match self {
            Self::Mapping(v) => Some(v),
            _ => None,
        }
    }
}

fn narrow(value: &RawValue, kind: ValueKind) -> Option<TypedValue<'_>> {
    match (value, kind) {
        (RawValue::Integer(v), ValueKind::Integer) => Some(TypedValue::Integer(*v)),
        (RawValue::Boolean(v), ValueKind::Boolean) => Some(TypedValue::Boolean(*v)),
        (RawValue::Text(v), ValueKind::Text) => Some(TypedValue::Text(v)),
        (RawValue::Bytes(v), ValueKind::Bytes) => Some(TypedValue::Bytes(v)),
        (RawValue::Mapping(v), ValueKind::Mapping) => Some(TypedValue::Mapping(v)),
        _ => None,
    }
}

/// Like [`get`], but says why nothing came back.
pub fn lookup<'a>(
    bag: &'a RawPropertyBag,
    key: &str,
    kind: ValueKind,
) -> Result<TypedValue<'a>, Omission> {
    let value = bag.get(key).ok_or(Omission::MissingField)?;
    narrow(value, kind).ok_or_else(|| {
        tracing::trace!(key, expected = ?kind, found = value.kind_name(), "type mismatch");
        Omission::TypeMismatch
    })
}

/// Fetch `key` from `bag` if it holds a value of `kind`.
#[inline]
pub fn get<'a>(bag: &'a RawPropertyBag, key: &str, kind: ValueKind) -> Option<TypedValue<'a>> {
    lookup(bag, key, kind).ok()
}
