//! Reverse geocoding client for address autofill.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::GeocodingConfig;

/// Geocoding provider base URL (Nominatim-compatible).
const BASE_URL: &str = "https://nominatim.openstreetmap.org";

/// Errors that can occur when reverse geocoding.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// No address found for the coordinates.
    #[error("no address for coordinates ({lat}, {lon})")]
    NoResult { lat: f64, lon: f64 },
}

/// Address components resolved from coordinates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolvedAddress {
    #[serde(default)]
    pub road: Option<String>,
    #[serde(default)]
    pub suburb: Option<String>,
    #[serde(default, alias = "town", alias = "village")]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub postcode: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

#[derive(Deserialize)]
struct ReverseResponse {
    address: Option<ResolvedAddress>,
}

/// Client for the reverse geocoding provider.
#[derive(Clone)]
pub struct GeocodingClient {
    client: reqwest::Client,
}

impl GeocodingClient {
    /// Create a new geocoding client.
    ///
    /// The provider requires an identifying User-Agent.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &GeocodingConfig) -> Result<Self, GeocodeError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { client })
    }

    /// Resolve coordinates to address components.
    ///
    /// # Errors
    ///
    /// Returns `GeocodeError::NoResult` if the provider has no address for
    /// the coordinates.
    pub async fn reverse(&self, lat: f64, lon: f64) -> Result<ResolvedAddress, GeocodeError> {
        let response = self
            .client
            .get(format!("{BASE_URL}/reverse"))
            .query(&[
                ("format", "jsonv2".to_string()),
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GeocodeError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ReverseResponse = response.json().await?;
        parsed.address.ok_or(GeocodeError::NoResult { lat, lon })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_reverse_response_shape() {
        let json = r#"{
            "place_id": 12345,
            "address": {
                "road": "MG Road",
                "city": "Bengaluru",
                "state": "Karnataka",
                "postcode": "560001",
                "country": "India"
            }
        }"#;

        let parsed: ReverseResponse = serde_json::from_str(json).unwrap();
        let address = parsed.address.unwrap();
        assert_eq!(address.city.as_deref(), Some("Bengaluru"));
        assert_eq!(address.postcode.as_deref(), Some("560001"));
    }

    #[test]
    fn test_reverse_response_town_alias() {
        let json = r#"{"address": {"town": "Alleppey", "state": "Kerala"}}"#;
        let parsed: ReverseResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.address.unwrap().city.as_deref(), Some("Alleppey"));
    }

    #[test]
    fn test_reverse_response_missing_address() {
        let parsed: ReverseResponse = serde_json::from_str(r#"{"place_id": 1}"#).unwrap();
        assert!(parsed.address.is_none());
    }
}
