//! Image-generation backend seam.
//!
//! The external image API is a collaborator, not part of this crate; this
//! module owns the typed boundary so the producer can be tested against a
//! mock and quota errors arrive as a distinct variant.

mod client;
mod types;

pub use client::HttpImageBackend;
pub use types::ImageGenError;

/// Trait for image-generation API communication.
#[cfg_attr(test, mockall::automock)]
pub trait ImageBackend: Send + Sync {
    /// Generate one slide image for `prompt`, authenticating with `api_key`.
    ///
    /// # Returns
    /// Raw PNG image bytes.
    fn generate(&self, prompt: &str, api_key: &str) -> Result<Vec<u8>, ImageGenError>;
}

/// Create an HTTP backend for the given API base URL.
pub fn create_backend(base_url: &str) -> HttpImageBackend {
    HttpImageBackend::new(base_url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_backend_normalizes_url() {
        let backend = create_backend("https://api.example.com/");
        assert_eq!(backend.base_url(), "https://api.example.com");
    }

    #[test]
    fn test_mock_backend_generate_success() {
        let mut mock = MockImageBackend::new();

        mock.expect_generate()
            .withf(|prompt, key| prompt.contains("data pipeline") && key == "key1")
            .times(1)
            .returning(|_, _| Ok(b"\x89PNG fake image".to_vec()));

        let result = mock.generate("Diagram of a data pipeline", "key1");

        assert!(result.is_ok());
        assert!(result.unwrap().starts_with(b"\x89PNG"));
    }

    #[test]
    fn test_mock_backend_quota_exceeded() {
        let mut mock = MockImageBackend::new();

        mock.expect_generate().times(1).returning(|_, _| {
            Err(ImageGenError::QuotaExceeded(
                "429 RESOURCE_EXHAUSTED".to_string(),
            ))
        });

        let result = mock.generate("anything", "key1");

        assert!(result.unwrap_err().is_quota_exceeded());
    }
}
