//! Maps `Box<dyn Error>` from the source trait boundary to typed `EngineError`.
//!
//! `battinfo_traits::PropertySource` returns `Box<dyn Error + Send + Sync>` so
//! backends stay decoupled; this module converts those to our typed error enum,
//! with an optional feature-gated path for `battinfo_hardware::SourceError`
//! downcasting.

use crate::error::EngineError;

/// Map a trait-boundary error to a typed `EngineError`.
///
/// Attempts to downcast known backend error types first, then falls back
/// to string-based heuristics.
pub fn map_source_error(e: &(dyn std::error::Error + 'static)) -> EngineError {
    #[cfg(feature = "source-errors")]
    {
        use battinfo_hardware::error::SourceError;
        if let Some(se) = e.downcast_ref::<SourceError>() {
            return match se {
                SourceError::Spawn { .. } => EngineError::SourceSpawn(se.to_string()),
                SourceError::Fixture(_) | SourceError::Io(_) => {
                    EngineError::SourceUnavailable(se.to_string())
                }
                other => EngineError::SourceFailed(other.to_string()),
            };
        }
    }

    let s = e.to_string();
    let lower = s.to_lowercase();
    if lower.contains("no such file") || lower.contains("not found") {
        EngineError::SourceSpawn(s)
    } else {
        EngineError::SourceUnavailable(s)
    }
}
