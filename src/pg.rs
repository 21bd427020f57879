//! Postgres plumbing shared by the repository implementations.

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::error::RepoError;

/// Builds the connection pool handed to the Postgres repositories.
pub async fn connect(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
        .context("connect to database")?;
    Ok(pool)
}

/// Applies the bundled schema migrations.
pub async fn migrate(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("run database migrations")?;
    Ok(())
}

pub(crate) fn map_sqlx(err: sqlx::Error) -> RepoError {
    match err.as_database_error() {
        Some(db) if db.is_unique_violation() => {
            RepoError::UniqueViolation(db.constraint().unwrap_or("unknown").to_string())
        }
        _ => RepoError::Unavailable(err.to_string()),
    }
}
