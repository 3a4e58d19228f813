//! Image host client.
//!
//! Banner uploads pass straight through to a third-party image host; only
//! the returned URL is stored locally.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::multipart;
use secrecy::ExposeSecret;
use serde::Deserialize;
use thiserror::Error;

use crate::config::ImageHostConfig;

/// Image host API base URL.
const BASE_URL: &str = "https://api.imgbb.com/1";

/// Errors that can occur when uploading to the image host.
#[derive(Debug, Error)]
pub enum ImageHostError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response.
    #[error("parse error: {0}")]
    Parse(String),
}

/// A successfully hosted image.
#[derive(Debug, Clone, Deserialize)]
pub struct HostedImage {
    /// Public URL of the hosted image.
    pub url: String,
    /// URL that deletes the image from the host.
    #[serde(default)]
    pub delete_url: Option<String>,
}

#[derive(Deserialize)]
struct UploadResponse {
    data: HostedImage,
}

/// Client for the third-party image host.
#[derive(Clone)]
pub struct ImageHostClient {
    client: reqwest::Client,
    api_key: String,
}

impl ImageHostClient {
    /// Create a new image host client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &ImageHostConfig) -> Result<Self, ImageHostError> {
        let client = reqwest::Client::builder().build()?;

        Ok(Self {
            client,
            api_key: config.api_key.expose_secret().to_string(),
        })
    }

    /// Upload image bytes and return the hosted URL.
    ///
    /// The host takes base64-encoded payloads in a multipart form.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the response cannot be parsed.
    pub async fn upload(&self, bytes: &[u8], name: &str) -> Result<HostedImage, ImageHostError> {
        let form = multipart::Form::new()
            .text("image", STANDARD.encode(bytes))
            .text("name", name.to_string());

        let response = self
            .client
            .post(format!("{BASE_URL}/upload"))
            .query(&[("key", self.api_key.as_str())])
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ImageHostError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: UploadResponse = response
            .json()
            .await
            .map_err(|e| ImageHostError::Parse(e.to_string()))?;

        Ok(parsed.data)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_response_shape() {
        let json = r#"{
            "data": {
                "url": "https://i.ibb.co/abc/banner.png",
                "delete_url": "https://ibb.co/abc/delete"
            },
            "success": true,
            "status": 200
        }"#;

        let parsed: UploadResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.data.url, "https://i.ibb.co/abc/banner.png");
        assert!(parsed.data.delete_url.is_some());
    }

    #[test]
    fn test_upload_response_without_delete_url() {
        let json = r#"{"data": {"url": "https://i.ibb.co/abc/banner.png"}}"#;
        let parsed: UploadResponse = serde_json::from_str(json).unwrap();
        assert!(parsed.data.delete_url.is_none());
    }
}
