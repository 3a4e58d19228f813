//! Contact message repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use mirakle_core::{Email, MessageId};

use super::RepositoryError;
use crate::models::message::ContactMessage;

#[derive(sqlx::FromRow)]
struct MessageRow {
    id: MessageId,
    name: String,
    email: String,
    message: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<MessageRow> for ContactMessage {
    type Error = RepositoryError;

    fn try_from(row: MessageRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: row.id,
            name: row.name,
            email,
            message: row.message,
            created_at: row.created_at,
        })
    }
}

/// Repository for contact message database operations.
pub struct MessageRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> MessageRepository<'a> {
    /// Create a new message repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Store a contact form submission.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        name: &str,
        email: &Email,
        message: &str,
    ) -> Result<ContactMessage, RepositoryError> {
        let row = sqlx::query_as::<_, MessageRow>(
            r"
            INSERT INTO contact_message (name, email, message)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, message, created_at
            ",
        )
        .bind(name)
        .bind(email)
        .bind(message)
        .fetch_one(self.pool)
        .await?;

        ContactMessage::try_from(row)
    }

    /// List submissions, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ContactMessage>, RepositoryError> {
        let rows = sqlx::query_as::<_, MessageRow>(
            r"
            SELECT id, name, email, message, created_at
            FROM contact_message
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            ",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(ContactMessage::try_from).collect()
    }
}
