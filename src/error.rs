use thiserror::Error;

/// Main error type for jukebox sync
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Sync endpoint rejected snapshot: status={status}")]
    PublishRejected { status: u16 },

    #[error("Mixer error: {0}")]
    Mixer(String),

    #[error("Record {0} has not been started")]
    NotStarted(String),

    #[error("Mismatching room id: old={old}, new={new}")]
    RoomMismatch { old: String, new: String },

    #[error("Multiple users are updating the same record: old={old}, new={new}")]
    UserMismatch { old: String, new: String },

    #[error("Expected new state to be newer than old state: new={new}, old={old}")]
    StaleState { new: String, old: String },

    #[error("Invalid duration: {0}")]
    InvalidDuration(String),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, SyncError>;
