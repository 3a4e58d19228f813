//! Contact message domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use mirakle_core::{Email, MessageId};

/// A message submitted through the public contact form.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub id: MessageId,
    pub name: String,
    pub email: Email,
    pub message: String,
    pub created_at: DateTime<Utc>,
}
