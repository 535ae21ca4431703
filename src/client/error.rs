use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("HTTP error! Status: {status}")]
    Status { status: u16 },

    #[error("Stream error: {0}")]
    Stream(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ClientError {
    #[must_use]
    pub const fn status(status: u16) -> Self {
        Self::Status { status }
    }

    /// Maps a reqwest failure onto the transport taxonomy.
    #[must_use]
    pub fn from_reqwest(err: &reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            Self::Timeout(timeout)
        } else if let Some(status) = err.status() {
            Self::status(status.as_u16())
        } else if err.is_body() || err.is_decode() {
            Self::Stream(err.to_string())
        } else if err.is_builder() {
            Self::InvalidRequest(err.to_string())
        } else {
            Self::Connection(err.to_string())
        }
    }
}
