use thiserror::Error;

/// Config could not be read, parsed, or validated (exit code 3).
#[derive(Debug, Error)]
#[error("invalid configuration: {0}")]
pub struct InvalidConfig(pub String);
