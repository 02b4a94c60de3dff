//! TOML fixture files as a property source.
//!
//! Mapping from TOML to registry values:
//! integer → Integer, boolean → Boolean, string → Text, table → Mapping,
//! array of integers in `0..=255` → Bytes. Anything else is rejected.
//!
//! ```toml
//! AppleRawCurrentCapacity = 3184
//! IsCharging = true
//! Serial = "F8Y2451A0B1Q9KNAX"
//! ManufacturerData = [0, 3, 51, 52, 49]
//!
//! [AdapterDetails]
//! Watts = 96
//! ```

use std::path::{Path, PathBuf};

use battinfo_traits::{PropertySource, RawPropertyBag, RawValue};

use crate::error::{Result, SourceError};

/// Re-reads a TOML fixture file on every snapshot.
#[derive(Debug, Clone)]
pub struct FixtureSource {
    path: PathBuf,
}

impl FixtureSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<RawPropertyBag> {
        let text = std::fs::read_to_string(&self.path)?;
        parse_fixture(&text)
            .map_err(|e| SourceError::Fixture(format!("{}: {e}", self.path.display())))
    }
}

impl PropertySource for FixtureSource {
    fn snapshot(&mut self) -> std::result::Result<RawPropertyBag, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.load()?)
    }

    fn describe(&self) -> &str {
        "fixture"
    }
}

/// Parse fixture text into a property bag.
pub fn parse_fixture(text: &str) -> Result<RawPropertyBag> {
    let table: toml::Table = text
        .parse()
        .map_err(|e: toml::de::Error| SourceError::Fixture(e.message().to_string()))?;
    table_to_bag(&table, "")
}

fn table_to_bag(table: &toml::Table, prefix: &str) -> Result<RawPropertyBag> {
    let mut bag = RawPropertyBag::new();
    for (key, value) in table {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        bag.insert(key.as_str(), to_raw(value, &path)?);
    }
    Ok(bag)
}

fn to_raw(value: &toml::Value, path: &str) -> Result<RawValue> {
    match value {
        toml::Value::Integer(v) => Ok(RawValue::Integer(*v)),
        toml::Value::Boolean(v) => Ok(RawValue::Boolean(*v)),
        toml::Value::String(v) => Ok(RawValue::Text(v.clone())),
        toml::Value::Table(t) => table_to_bag(t, path).map(RawValue::Mapping),
        toml::Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_integer()
                    .and_then(|i| u8::try_from(i).ok())
                    .ok_or_else(|| {
                        SourceError::Fixture(format!("{path}: arrays must hold bytes (0..=255)"))
                    })
            })
            .collect::<Result<Vec<u8>>>()
            .map(RawValue::Bytes),
        other => Err(SourceError::Fixture(format!(
            "{path}: unsupported value type {}",
            other.type_str()
        ))),
    }
}
