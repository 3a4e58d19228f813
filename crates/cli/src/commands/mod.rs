//! CLI command implementations.

pub mod migrate;
pub mod seed;

use mirakle_server::db::RepositoryError;

/// Errors shared by CLI commands.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Read the database URL the same way the server does.
pub fn database_url() -> Result<secrecy::SecretString, CliError> {
    dotenvy::dotenv().ok();

    std::env::var("MIRAKLE_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(secrecy::SecretString::from)
        .map_err(|_| CliError::MissingEnvVar("MIRAKLE_DATABASE_URL"))
}
