use thiserror::Error;

/// A required field was blank after trimming.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("bot name cannot be empty")]
    EmptyName,

    #[error("persona cannot be empty")]
    EmptyPersona,
}

/// Errors from the generation endpoint.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid response from server: {0}")]
    Malformed(String),
}

/// Errors from the durable key/value storage port.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("storage I/O error: {0}")]
    Io(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Errors from bot store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("bot not found: '{0}'")]
    NotFound(String),

    #[error("'{0}' matches more than one bot")]
    Ambiguous(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors from sending a prompt in a conversation.
#[derive(Debug, Error)]
pub enum SendError {
    #[error("prompt cannot be empty")]
    EmptyPrompt,

    #[error("a message is already being sent")]
    AlreadySending,

    #[error(transparent)]
    Generate(#[from] GenerateError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors decoding inline audio.
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("message has no audio")]
    Missing,

    #[error("not an audio data URI")]
    NotADataUri,

    #[error("invalid base64 audio: {0}")]
    InvalidBase64(String),
}
