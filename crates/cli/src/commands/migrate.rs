//! Database migration command.
//!
//! Migrations are embedded at compile time from the server crate's
//! `migrations/` directory and applied in order. Re-running is safe;
//! applied migrations are skipped.

use mirakle_server::db;

use super::CliError;

/// Run pending database migrations.
pub async fn run() -> Result<(), CliError> {
    let database_url = super::database_url()?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&database_url).await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../server/migrations").run(&pool).await?;

    tracing::info!("Migrations complete");
    Ok(())
}
