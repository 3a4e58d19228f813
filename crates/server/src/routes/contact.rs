//! Contact form handlers.

use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use mirakle_core::Email;

use crate::db::MessageRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::message::ContactMessage;
use crate::state::AppState;

const MAX_MESSAGE_LENGTH: usize = 5000;
const DEFAULT_PAGE_SIZE: i64 = 50;
const MAX_PAGE_SIZE: i64 = 200;

/// Contact form submission body.
#[derive(Debug, Deserialize)]
pub struct ContactBody {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// Pagination for the message list.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Accept a contact form submission.
///
/// `POST /contact`
///
/// The message is stored first; the inbox notification email is best
/// effort and its failure never loses the submission.
#[instrument(skip(state, body))]
pub async fn submit(
    State(state): State<AppState>,
    Json(body): Json<ContactBody>,
) -> Result<Json<Value>> {
    let name = body.name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("name is required".to_string()));
    }
    let email = Email::parse(&body.email).map_err(|e| AppError::Validation(e.to_string()))?;
    let message = body.message.trim();
    if message.is_empty() {
        return Err(AppError::Validation("message is required".to_string()));
    }
    if message.len() > MAX_MESSAGE_LENGTH {
        return Err(AppError::Validation("message too long".to_string()));
    }

    let stored = MessageRepository::new(state.pool())
        .create(name, &email, message)
        .await?;

    if let Err(err) = state
        .mailer()
        .send_contact_notification(name, &email, message)
        .await
    {
        tracing::warn!(message_id = %stored.id, error = %err, "Contact notification failed");
    }

    Ok(Json(json!({ "message": "Message received" })))
}

/// List stored contact messages.
///
/// `GET /contact`
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<ContactMessage>>> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let offset = query.offset.unwrap_or(0).max(0);

    let messages = MessageRepository::new(state.pool())
        .list(limit, offset)
        .await?;

    Ok(Json(messages))
}
