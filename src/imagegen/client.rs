//! HTTP client for the image-generation API.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Deserialize;

use super::ImageBackend;
use super::types::ImageGenError;

/// HTTP-based image generation client.
pub struct HttpImageBackend {
    base_url: String,
    client: reqwest::blocking::Client,
}

#[derive(Deserialize)]
struct GenerateResponse {
    image: ImagePayload,
}

#[derive(Deserialize)]
struct ImagePayload {
    /// Base64-encoded PNG bytes.
    data: String,
}

impl HttpImageBackend {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::blocking::Client::new(),
        }
    }

    /// Get the base URL for this backend.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn generate_url(&self) -> String {
        format!("{}/v1/images:generate", self.base_url)
    }
}

impl ImageBackend for HttpImageBackend {
    fn generate(&self, prompt: &str, api_key: &str) -> Result<Vec<u8>, ImageGenError> {
        let body = serde_json::json!({
            "prompt": format!("Professional 16:9 image for a presentation slide. {prompt}"),
            "aspect_ratio": "16:9"
        });

        let response = self
            .client
            .post(self.generate_url())
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .map_err(|e| ImageGenError::ConnectionFailed(e.to_string()))?;

        let status = response.status();
        if status.as_u16() == 429 {
            let text = response.text().unwrap_or_default();
            return Err(ImageGenError::QuotaExceeded(format!("429: {text}")));
        }
        if !status.is_success() {
            let text = response.text().unwrap_or_default();
            // Some providers report daily quota exhaustion in the body
            if text.contains("RESOURCE_EXHAUSTED") || text.to_lowercase().contains("quota") {
                return Err(ImageGenError::QuotaExceeded(format!("{status}: {text}")));
            }
            return Err(ImageGenError::RequestFailed(format!("{status}: {text}")));
        }

        let payload: GenerateResponse = response
            .json()
            .map_err(|e| ImageGenError::InvalidResponse(e.to_string()))?;

        BASE64
            .decode(&payload.image.data)
            .map_err(|e| ImageGenError::InvalidResponse(format!("bad base64 image data: {e}")))
    }
}
