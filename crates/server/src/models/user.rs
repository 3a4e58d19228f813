//! User domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use mirakle_core::{Email, UserId};

/// A Mirakle account (domain type).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub email: Email,
    /// Display name chosen at signup.
    pub name: String,
    /// Whether the email has completed OTP verification.
    pub email_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The authenticated identity attached to a request.
///
/// Resolved by the auth extractor from a bearer token; handlers trust this
/// value without further validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: UserId,
    pub email: Email,
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
        }
    }
}
