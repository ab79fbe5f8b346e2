//! Response types: the transport-level [`Response`] trait and the [`ApiResponse`] envelope
use serde::{Deserialize, Serialize};

/// Trait for HTTP response objects
pub trait Response {
    /// Get the HTTP status code
    fn status(&self) -> u16;

    /// Get the response body as a string
    fn body(&self) -> &str;

    /// The ID of the corresponding request
    fn request_id(&self) -> &Option<String>;

    /// Whether the status counts as success (2xx or 3xx)
    fn is_success(&self) -> bool {
        (200..400).contains(&self.status())
    }
}

/// Uniform outcome of every call made through [`ApiClient`](crate::client::ApiClient).
///
/// Exactly one of `data` and `error` is set. `loading` is always `false` in a
/// returned envelope since the call it describes has already completed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Decoded response body on success
    pub data: Option<T>,
    /// Failure message otherwise
    pub error: Option<String>,
    /// Always `false` once returned
    pub loading: bool,
}

impl<T> ApiResponse<T> {
    /// Envelope for a successful call
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            loading: false,
        }
    }

    /// Envelope for a failed call
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            data: None,
            error: Some(message.into()),
            loading: false,
        }
    }

    /// `true` when the call produced data
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Convert into a standard `Result`, with the error message as the `Err` value.
    pub fn into_result(self) -> std::result::Result<T, String> {
        match (self.data, self.error) {
            (_, Some(error)) => Err(error),
            (Some(data), None) => Ok(data),
            (None, None) => Err("Unknown error".to_string()),
        }
    }
}

impl<T> From<crate::error::Result<T>> for ApiResponse<T> {
    fn from(result: crate::error::Result<T>) -> Self {
        match result {
            Ok(data) => Self::success(data),
            Err(err) => Self::failure(err.to_string()),
        }
    }
}
