use thiserror::Error;

/// Failures surfaced by [`crate::try_poll`].
///
/// Assembly itself never fails; these only describe why a snapshot could not
/// be taken. [`crate::poll`] swallows them into an empty bag.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("registry source could not be started: {0}")]
    SourceSpawn(String),
    #[error("registry source failed: {0}")]
    SourceFailed(String),
    #[error("registry snapshot unavailable: {0}")]
    SourceUnavailable(String),
}

/// Why a reading was left out of the sequence.
///
/// None of these are errors; each one only means "no reading for this label".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Omission {
    /// No candidate key was present.
    MissingField,
    /// A candidate key was present but held the wrong kind of value.
    TypeMismatch,
    /// A derived metric's divisor was not positive.
    GuardFailure,
    /// The manufacturer blob held no usable strings.
    BlobDecodeEmpty,
    /// The snapshot itself could not be taken.
    SourceUnavailable,
}

impl Omission {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing field",
            Self::TypeMismatch => "type mismatch",
            Self::GuardFailure => "guard failure",
            Self::BlobDecodeEmpty => "blob decode empty",
            Self::SourceUnavailable => "source unavailable",
        }
    }
}

impl std::fmt::Display for Omission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
