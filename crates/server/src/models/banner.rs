//! Promotional banner domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use mirakle_core::BannerId;

/// A promotional banner shown on the storefront home page.
///
/// The image itself lives at the third-party image host; only the hosted
/// URL is stored locally.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Banner {
    pub id: BannerId,
    pub image_url: String,
    /// Optional click-through target.
    pub link: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}
