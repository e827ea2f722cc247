use thiserror::Error;

/// Result type for parklog-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the record store, the visitor recorder and the reporting path.
///
/// A missing record is never an error: lookups return `Option`.
#[derive(Debug, Error)]
pub enum Error {
    /// Rejected user input. Nothing was written.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A timeslot index that does not exist in the draft.
    #[error("Index {index} out of range (draft has {len} timeslots)")]
    IndexOutOfRange { index: usize, len: usize },

    /// Reading or writing a collection did not complete.
    #[error("Storage failure: {0}")]
    Storage(#[from] std::io::Error),

    /// A stored collection could not be decoded or encoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV export error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Could not determine home directory")]
    NoHomeDir,
}

impl Error {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }

    /// True for errors the user can fix by re-entering data.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::InvalidInput(_) | Error::IndexOutOfRange { .. })
    }
}
