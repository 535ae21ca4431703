use thiserror::Error;

use crate::client::ClientError;
use crate::core::decoder::DecodeError;

/// Failure that ends a single turn.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TurnError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl TurnError {
    /// Short label for logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Client(ClientError::Status { .. }) => "status",
            Self::Client(_) => "transport",
            Self::Decode(_) => "decode",
        }
    }

    /// Transcript text for this failure.
    #[must_use]
    pub fn notice(&self) -> String {
        format!("Error: {self}")
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Client error: {0}")]
    Client(#[from] ClientError),

    #[error("Turn failed: {0}")]
    TurnFailed(String),
}

pub type Result<T> = std::result::Result<T, AppError>;
