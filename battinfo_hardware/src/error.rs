use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{program} exited unsuccessfully ({status})")]
    Exit { program: String, status: String },
    #[error("{program} timed out after {timeout_ms} ms")]
    Timeout { program: String, timeout_ms: u64 },
    #[error("registry output is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("fixture: {0}")]
    Fixture(String),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SourceError>;
