pub mod clock;
pub mod value;

pub use clock::{Clock, MonotonicClock};
pub use value::{RawPropertyBag, RawValue};

/// Anything that can hand the engine one snapshot of the power-source registry.
///
/// Implementations own acquisition and release of whatever handle backs the
/// snapshot; the returned bag is detached from it.
pub trait PropertySource {
    fn snapshot(&mut self) -> Result<RawPropertyBag, Box<dyn std::error::Error + Send + Sync>>;

    /// Short name used in logs.
    fn describe(&self) -> &str {
        "source"
    }
}

impl<S: PropertySource + ?Sized> PropertySource for Box<S> {
    fn snapshot(&mut self) -> Result<RawPropertyBag, Box<dyn std::error::Error + Send + Sync>> {
        (**self).snapshot()
    }

    fn describe(&self) -> &str {
        (**self).describe()
    }
}
