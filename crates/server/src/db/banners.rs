//! Banner repository for promotional banners.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use mirakle_core::BannerId;

use super::RepositoryError;
use crate::models::banner::Banner;

#[derive(sqlx::FromRow)]
struct BannerRow {
    id: BannerId,
    image_url: String,
    link: Option<String>,
    active: bool,
    created_at: DateTime<Utc>,
}

impl From<BannerRow> for Banner {
    fn from(row: BannerRow) -> Self {
        Self {
            id: row.id,
            image_url: row.image_url,
            link: row.link,
            active: row.active,
            created_at: row.created_at,
        }
    }
}

/// Repository for banner database operations.
pub struct BannerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> BannerRepository<'a> {
    /// Create a new banner repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List active banners, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_active(&self) -> Result<Vec<Banner>, RepositoryError> {
        let rows = sqlx::query_as::<_, BannerRow>(
            r"
            SELECT id, image_url, link, active, created_at
            FROM banner
            WHERE active
            ORDER BY created_at DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Banner::from).collect())
    }

    /// Record a banner whose image has been uploaded to the image host.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        image_url: &str,
        link: Option<&str>,
    ) -> Result<Banner, RepositoryError> {
        let row = sqlx::query_as::<_, BannerRow>(
            r"
            INSERT INTO banner (image_url, link)
            VALUES ($1, $2)
            RETURNING id, image_url, link, active, created_at
            ",
        )
        .bind(image_url)
        .bind(link)
        .fetch_one(self.pool)
        .await?;

        Ok(Banner::from(row))
    }

    /// Delete a banner.
    ///
    /// Returns `true` if the banner was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: BannerId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM banner WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
