//! Image backend error types.

use thiserror::Error;

/// Errors that can occur when calling the image-generation API.
#[derive(Error, Debug)]
pub enum ImageGenError {
    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ImageGenError {
    /// Whether the provider rejected the call for quota reasons. The caller
    /// must report these to the account pool so it can rotate.
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, ImageGenError::QuotaExceeded(_))
    }
}
