#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::cast_precision_loss
)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Battery telemetry extraction engine (backend-agnostic).
//!
//! This crate turns one snapshot of loosely-typed registry properties into an
//! ordered list of labeled, display-ready readings. All registry access goes
//! through the `battinfo_traits::PropertySource` trait; nothing here performs
//! I/O or holds resources.
//!
//! ## Architecture
//!
//! - **Accessor**: narrows one bag entry to an expected kind (`accessor` module)
//! - **Resolver**: ordered fallback chains of candidate keys (`resolve` module)
//! - **Units**: raw scales to fixed-point display strings (`units` module)
//! - **Derived metrics**: power, charge %, health % with divisor guards (`derive` module)
//! - **Blob decoder**: length-prefixed ASCII scan of the manufacturer blob (`blob` module)
//! - **Assembler**: declarative emission table walked once per poll (`assemble` module)
//!
//! A missing field, a wrongly typed field, or a failed guard never aborts a
//! poll; the affected reading is simply left out.

pub mod accessor;
pub mod assemble;
pub mod blob;
pub mod derive;
pub mod error;
pub mod reading;
pub mod resolve;
pub mod source_error;
pub mod units;

pub use accessor::{TypedValue, ValueKind};
pub use assemble::{Assembly, EMISSION_ORDER, assemble, assemble_with_report};
pub use error::{EngineError, Omission};
pub use reading::{Label, TelemetryReading, TelemetrySequence};

use battinfo_traits::{PropertySource, RawPropertyBag};

use crate::source_error::map_source_error;

/// Take one snapshot from `source` and assemble it, surfacing snapshot failures.
pub fn try_poll<S: PropertySource + ?Sized>(source: &mut S) -> error::Result<Assembly> {
    let bag = source.snapshot().map_err(|e| map_source_error(&*e))?;
    tracing::debug!(source = source.describe(), properties = bag.len(), "snapshot taken");
    Ok(assemble_with_report(&bag))
}

/// Take one snapshot from `source` and assemble it, keeping the omission report.
///
/// An unavailable snapshot is not an error here: it is logged and the empty
/// bag is assembled instead. Every label is then reported as
/// [`Omission::SourceUnavailable`].
pub fn poll_with_report<S: PropertySource + ?Sized>(source: &mut S) -> Assembly {
    match try_poll(source) {
        Ok(assembly) => assembly,
        Err(err) => {
            tracing::warn!(
                source = source.describe(),
                error = %err,
                reason = %Omission::SourceUnavailable,
                "snapshot failed; assembling empty bag"
            );
            let mut assembly = assemble_with_report(&RawPropertyBag::new());
            for (_, reason) in &mut assembly.omitted {
                *reason = Omission::SourceUnavailable;
            }
            assembly
        }
    }
}

/// Take one snapshot from `source` and assemble it.
///
/// Never fails; see [`poll_with_report`].
pub fn poll<S: PropertySource + ?Sized>(source: &mut S) -> TelemetrySequence {
    poll_with_report(source).readings
}
