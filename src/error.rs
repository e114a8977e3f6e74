use thiserror::Error;

/// Errors raised by the service client
#[derive(Error, Debug)]
pub enum Error {
    /// The client configuration could not be built
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The HTTP exchange failed before a response body was read
    #[error("Transport failed: {0}")]
    Transport(String),
}

/// Result type used across the crate
pub type Result<T> = std::result::Result<T, Error>;

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}
