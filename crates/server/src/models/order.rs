//! Payment order domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use mirakle_core::{PaymentOrderId, PaymentStatus, Price, UserId};

/// A payment order created at the gateway and recorded locally.
///
/// Only creation is handled here; capture and settlement are gateway-side
/// and reconciled out of band.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentOrder {
    pub id: PaymentOrderId,
    pub user_id: UserId,
    /// The gateway's identifier for this order.
    pub gateway_order_id: String,
    pub amount: Price,
    /// Merchant-side receipt reference passed to the gateway.
    pub receipt: String,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
}
