pub mod error;
pub mod fixture;
pub mod ioreg;
pub mod util;

use battinfo_traits::{PropertySource, RawPropertyBag};

pub use fixture::FixtureSource;
pub use ioreg::IoregSource;

/// Simulated registry: hands back the same bag on every snapshot.
#[derive(Debug, Clone, Default)]
pub struct SimulatedSource {
    bag: RawPropertyBag,
    fail: bool,
}

impl SimulatedSource {
    pub fn new(bag: RawPropertyBag) -> Self {
        Self { bag, fail: false }
    }

    /// A source whose snapshots always fail.
    pub fn failing() -> Self {
        Self {
            bag: RawPropertyBag::new(),
            fail: true,
        }
    }

    /// A laptop battery on a 96 W adapter, partway through charging.
    pub fn typical() -> Self {
        Self::new(typical_bag())
    }
}

/// Registry snapshot used by `SimulatedSource::typical`.
pub fn typical_bag() -> RawPropertyBag {
    let adapter = RawPropertyBag::new()
        .with("Watts", 96i64)
        .with("Name", "96W USB-C Power Adapter")
        .with("AdapterVoltage", 20_000i64)
        .with("Current", 4_800i64)
        .with("SerialString", "C4H1234ABCD")
        .with("Manufacturer", "Apple Inc.");
    let lifetime = RawPropertyBag::new().with("MaximumDischargeCurrent", 6_120i64);
    let manufacturer_data: Vec<u8> = vec![
        0x00, 0x00, 0x00, 0x00, 0x03, b'3', b'4', b'1', 0x00, 0x04, b'D', b'S', b'Y', b'2', 0x00,
        0x06, b'A', b'0', b'1', b'2', b'3', b'4',
    ];
    RawPropertyBag::new()
        .with("AppleRawCurrentCapacity", 3_184i64)
        .with("CurrentCapacity", 72i64)
        .with("AppleRawMaxCapacity", 4_420i64)
        .with("MaxCapacity", 100i64)
        .with("DesignCapacity", 4_563i64)
        .with("CycleCount", 187i64)
        .with("LifetimeData", lifetime)
        .with("Temperature", 3_054i64)
        .with("Voltage", 12_480i64)
        .with("InstantAmperage", 2_150i64)
        .with("Amperage", 2_098i64)
        .with("IsCharging", true)
        .with("FullyCharged", false)
        .with("ManufacturerData", manufacturer_data)
        .with("Serial", "F8Y2451A0B1Q9KNAX")
        .with("AdapterDetails", adapter)
        .with("ExternalConnected", true)
}

impl PropertySource for SimulatedSource {
    fn snapshot(&mut self) -> Result<RawPropertyBag, Box<dyn std::error::Error + Send + Sync>> {
        if self.fail {
            return Err(Box::new(std::io::Error::other("simulated registry unavailable")));
        }
        tracing::trace!(properties = self.bag.len(), "simulated snapshot");
        Ok(self.bag.clone())
    }

    fn describe(&self) -> &str {
        "simulated"
    }
}
