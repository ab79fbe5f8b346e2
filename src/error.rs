//! Error types for jsonfetch
//!
//! These errors never reach callers of [`ApiClient`](crate::client::ApiClient)'s
//! request methods directly: the executor flattens them to their display text and
//! reports them through the [`ApiResponse`](crate::response::ApiResponse) envelope.

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Failure kinds of a single request
#[derive(Debug, Error)]
pub enum Error {
    /// The transport failed before a response was obtained (DNS, connection, abort)
    #[error("{0}")]
    Transport(String),

    /// The request URL could not be parsed by the transport
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A response arrived with a non-success status; `message` is the raw body text
    #[error("{message}")]
    Network {
        /// HTTP status code
        status: u16,
        /// Value of the `X-Request-Id` response header, if any
        request_id: Option<String>,
        /// Raw response body
        message: String,
    },

    /// The response body is not JSON text decodable into the expected type
    #[error("{0}")]
    Decode(#[from] serde_json::Error),

    /// The request body could not be serialized to JSON text
    #[error("{0}")]
    Encode(#[source] serde_json::Error),

    /// No base URL was configured in the environment
    #[error("API_BASE_URL is not set")]
    MissingBaseUrl,

    /// Free-form error
    #[error("{0}")]
    Custom(String),

    /// A failure that carries no message of its own
    #[error("Unknown error")]
    Unknown,
}

impl Error {
    /// Build a transport error from any displayable failure.
    ///
    /// Failures whose text is empty become [`Error::Unknown`].
    pub fn transport(err: impl std::fmt::Display) -> Self {
        let text = err.to_string();
        if text.is_empty() {
            Error::Unknown
        } else {
            Error::Transport(text)
        }
    }

    /// HTTP status of a [`Error::Network`] failure
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Network { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(feature = "reqwest")]
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::transport(err)
    }
}
