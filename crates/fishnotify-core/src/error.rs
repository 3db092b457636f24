use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Process not found: {0}")]
    ProcessNotFound(String),

    #[error("Failed to open process: {0}")]
    ProcessOpenFailed(String),

    #[error("Failed to read process memory at address {address:#x}: {message}")]
    MemoryReadFailed { address: u64, message: String },

    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    #[error("Config parse error: {0}")]
    ConfigParseError(String),

    #[error("Opcode list error: {0}")]
    OpcodeListError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn invalid_signature(message: impl Into<String>) -> Self {
        Error::InvalidSignature(message.into())
    }

    pub fn opcode_list(message: impl Into<String>) -> Self {
        Error::OpcodeListError(message.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
