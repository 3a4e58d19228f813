//! Payment order repository.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use mirakle_core::{CurrencyCode, PaymentOrderId, PaymentStatus, Price, UserId};

use super::RepositoryError;
use crate::models::order::PaymentOrder;

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: PaymentOrderId,
    user_id: UserId,
    gateway_order_id: String,
    amount: Decimal,
    currency: String,
    receipt: String,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for PaymentOrder {
    type Error = RepositoryError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let currency = CurrencyCode::parse(&row.currency).ok_or_else(|| {
            RepositoryError::DataCorruption(format!("unknown currency code: {}", row.currency))
        })?;
        let status = PaymentStatus::parse(&row.status).ok_or_else(|| {
            RepositoryError::DataCorruption(format!("unknown payment status: {}", row.status))
        })?;

        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            gateway_order_id: row.gateway_order_id,
            amount: Price::new(row.amount, currency),
            receipt: row.receipt,
            status,
            created_at: row.created_at,
        })
    }
}

const ORDER_COLUMNS: &str =
    "id, user_id, gateway_order_id, amount, currency, receipt, status, created_at";

/// Repository for payment order database operations.
pub struct PaymentOrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PaymentOrderRepository<'a> {
    /// Create a new payment order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Record an order created at the payment gateway.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        user_id: UserId,
        gateway_order_id: &str,
        amount: Price,
        receipt: &str,
    ) -> Result<PaymentOrder, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            r"
            INSERT INTO payment_order (user_id, gateway_order_id, amount, currency, receipt, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {ORDER_COLUMNS}
            "
        ))
        .bind(user_id)
        .bind(gateway_order_id)
        .bind(amount.amount)
        .bind(amount.currency_code.code())
        .bind(receipt)
        .bind(PaymentStatus::Created.as_str())
        .fetch_one(self.pool)
        .await?;

        PaymentOrder::try_from(row)
    }

    /// List a user's payment orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<PaymentOrder>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            r"
            SELECT {ORDER_COLUMNS}
            FROM payment_order
            WHERE user_id = $1
            ORDER BY created_at DESC
            "
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(PaymentOrder::try_from).collect()
    }
}
