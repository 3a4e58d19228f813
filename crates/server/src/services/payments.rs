//! Payment gateway client for order creation.
//!
//! Creates orders at the gateway's REST API with basic auth. Amounts are
//! sent in the currency's smallest unit (paise for INR).

use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use mirakle_core::{Price, PriceError};

use crate::config::PaymentConfig;

/// Payment gateway API base URL.
const BASE_URL: &str = "https://api.razorpay.com/v1";

/// Errors that can occur when talking to the payment gateway.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The amount cannot be expressed in gateway subunits.
    #[error("invalid amount: {0}")]
    Amount(#[from] PriceError),

    /// Failed to parse response.
    #[error("parse error: {0}")]
    Parse(String),
}

#[derive(Debug, Serialize)]
struct CreateOrderRequest<'a> {
    /// Amount in the smallest currency unit.
    amount: i64,
    currency: &'a str,
    receipt: &'a str,
}

/// An order as returned by the gateway.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayOrder {
    /// The gateway's order identifier (e.g., `order_...`).
    pub id: String,
    /// Amount in the smallest currency unit, echoed back.
    pub amount: i64,
    pub currency: String,
    pub receipt: String,
    pub status: String,
}

/// Client for the payment gateway.
#[derive(Clone)]
pub struct PaymentClient {
    client: reqwest::Client,
    key_id: String,
    key_secret: String,
    base_url: String,
}

impl PaymentClient {
    /// Create a new payment gateway client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &PaymentConfig) -> Result<Self, PaymentError> {
        let client = reqwest::Client::builder().build()?;

        Ok(Self {
            client,
            key_id: config.key_id.clone(),
            key_secret: config.key_secret.expose_secret().to_string(),
            base_url: BASE_URL.to_string(),
        })
    }

    /// Create an order at the gateway for the given amount.
    ///
    /// # Errors
    ///
    /// Returns `PaymentError::Amount` for amounts that don't convert to
    /// subunits, `PaymentError::Api` for gateway rejections.
    pub async fn create_order(
        &self,
        amount: Price,
        receipt: &str,
    ) -> Result<GatewayOrder, PaymentError> {
        let body = CreateOrderRequest {
            amount: amount.subunits()?,
            currency: amount.currency_code.code(),
            receipt,
        };

        let response = self
            .client
            .post(format!("{}/orders", self.base_url))
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(PaymentError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| PaymentError::Parse(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use mirakle_core::CurrencyCode;
    use rust_decimal::Decimal;

    #[test]
    fn test_create_order_request_body() {
        let price = Price::new(Decimal::new(499, 0), CurrencyCode::INR);
        let body = CreateOrderRequest {
            amount: price.subunits().unwrap(),
            currency: price.currency_code.code(),
            receipt: "rcpt_42",
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"amount": 49_900, "currency": "INR", "receipt": "rcpt_42"})
        );
    }

    #[test]
    fn test_gateway_order_shape() {
        let json = r#"{
            "id": "order_EKwxwAgItmmXdp",
            "entity": "order",
            "amount": 49900,
            "amount_paid": 0,
            "currency": "INR",
            "receipt": "rcpt_42",
            "status": "created"
        }"#;

        let parsed: GatewayOrder = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.id, "order_EKwxwAgItmmXdp");
        assert_eq!(parsed.amount, 49_900);
        assert_eq!(parsed.status, "created");
    }
}
