//! Fetch error types

use std::time::Duration;

/// Hard failures raised by a [`DataSource`](crate::fetch::DataSource).
///
/// A response carrying `success: false` is a soft failure and never shows up
/// here; see [`RequestData`](crate::fetch::RequestData).
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The request mechanism itself failed.
    #[error("Request failed: {message}")]
    Request {
        /// Description of the failure.
        message: String,
        /// Status code reported by the backend, if any.
        status: Option<u16>,
    },

    /// The request did not complete in time.
    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    /// The response body could not be decoded.
    #[error("Invalid response: {0}")]
    InvalidResponse(#[from] serde_json::Error),

    /// Any other error raised by a custom data source.
    #[error(transparent)]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl FetchError {
    /// Creates a new request error.
    pub fn request(message: impl Into<String>) -> Self {
        Self::Request {
            message: message.into(),
            status: None,
        }
    }

    /// Creates a new request error with a backend status code.
    pub fn request_with_status(status: u16, message: impl Into<String>) -> Self {
        Self::Request {
            message: message.into(),
            status: Some(status),
        }
    }

    /// Wraps an arbitrary error.
    pub fn other(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Other(Box::new(err))
    }

    /// Returns `true` if the request timed out.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}
