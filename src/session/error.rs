//! Session recording error types.

use thiserror::Error;

/// Errors raised while recording a completed work segment.
///
/// These never stop a session: the engine flags the failure on its state
/// and keeps advancing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// The session log could not be written or read.
    #[error("session log I/O failed: {0}")]
    Io(String),

    /// A record could not be (de)serialized.
    #[error("session record serialization failed: {0}")]
    Serialization(String),

    /// The persistence backend refused the record.
    #[error("session record rejected: {0}")]
    Rejected(String),
}

impl RecordError {
    /// Returns true if this error came from the filesystem.
    #[must_use]
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io(_))
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::Io(_) => "check that the session log directory is writable",
            Self::Serialization(_) => "the session log may be corrupted; move it aside",
            Self::Rejected(_) => "retry once the storage backend is reachable",
        }
    }
}

impl From<std::io::Error> for RecordError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for RecordError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
