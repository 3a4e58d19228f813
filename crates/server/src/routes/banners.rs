//! Promotional banner handlers.
//!
//! Banner images are uploaded to the third-party image host and only the
//! hosted URL is persisted locally.

use axum::Json;
use axum::extract::{Multipart, Path, State};
use serde_json::{Value, json};
use tracing::instrument;

use mirakle_core::BannerId;

use crate::db::BannerRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::banner::Banner;
use crate::state::AppState;

/// Reject uploads larger than this before they reach the image host.
const MAX_IMAGE_BYTES: usize = 8 * 1024 * 1024;

/// List active banners.
///
/// `GET /banners`
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Banner>>> {
    let banners = BannerRepository::new(state.pool()).list_active().await?;
    Ok(Json(banners))
}

/// Upload a banner image and record it.
///
/// `POST /banners` (multipart: `image` required, `link` optional)
#[instrument(skip(state, user, multipart), fields(user_id = %user.id))]
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    mut multipart: Multipart,
) -> Result<Json<Banner>> {
    let mut image: Option<(Vec<u8>, String)> = None;
    let mut link: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart body: {e}")))?
    {
        // Field metadata is copied out first; reading the body consumes the field.
        let field_name = field.name().map(str::to_owned);
        match field_name.as_deref() {
            Some("image") => {
                let name = field
                    .file_name()
                    .unwrap_or("banner")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("failed to read image: {e}")))?;
                image = Some((bytes.to_vec(), name));
            }
            Some("link") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("failed to read link: {e}")))?;
                let value = value.trim().to_string();
                if !value.is_empty() {
                    link = Some(value);
                }
            }
            _ => {}
        }
    }

    let (bytes, name) =
        image.ok_or_else(|| AppError::Validation("image field is required".to_string()))?;
    if bytes.is_empty() {
        return Err(AppError::Validation("image is empty".to_string()));
    }
    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(AppError::Validation("image too large".to_string()));
    }

    let hosted = state.images().upload(&bytes, &name).await?;
    let banner = BannerRepository::new(state.pool())
        .create(&hosted.url, link.as_deref())
        .await?;

    tracing::info!(banner_id = %banner.id, "Banner created");
    Ok(Json(banner))
}

/// Delete a banner.
///
/// `DELETE /banners/{id}`
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn destroy(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<BannerId>,
) -> Result<Json<Value>> {
    let deleted = BannerRepository::new(state.pool()).delete(id).await?;
    if !deleted {
        return Err(AppError::NotFound(format!("banner {id} not found")));
    }

    Ok(Json(json!({ "message": "Banner deleted" })))
}
