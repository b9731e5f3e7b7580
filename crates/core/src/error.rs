/// Result alias that carries the custom [`ShelfError`] type.
pub type Result<T> = std::result::Result<T, ShelfError>;

/// Common error type for the core crate.
#[derive(Debug, thiserror::Error)]
pub enum ShelfError {
    /// A submitted record was rejected. The only failure surfaced to the user.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Durable storage could not be read or written.
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// An audio output refused to start.
    #[error(transparent)]
    Playback(#[from] PlaybackError),
    /// Free-form message for failures without a dedicated variant.
    #[error("{0}")]
    Message(String),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// Wrapper around JSON (de)serialization errors.
    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

impl ShelfError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }
}

impl From<&str> for ShelfError {
    fn from(value: &str) -> Self {
        Self::msg(value)
    }
}

impl From<String> for ShelfError {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}

/// User-correctable problems with a submitted record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    #[error("year `{0}` is not an integer")]
    InvalidYear(String),
}

/// Failures of the durable key-value store.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to read `{key}`: {reason}")]
    Read { key: String, reason: String },
    #[error("failed to write `{key}`: {reason}")]
    Write { key: String, reason: String },
    #[error("storage quota exceeded writing `{key}` ({needed} bytes, {quota} allowed)")]
    QuotaExceeded {
        key: String,
        needed: usize,
        quota: usize,
    },
    #[error("stored value under `{key}` is malformed: {reason}")]
    Malformed { key: String, reason: String },
}

/// Audio that could not be started.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlaybackError {
    /// The host refused to start playback, e.g. an autoplay policy.
    #[error("playback of `{source_name}` was rejected")]
    Rejected { source_name: String },
    #[error("no audio source loaded")]
    NoSource,
}
