//! Database migration command.
//!
//! Migrations live in `crates/admin/migrations/` and are embedded at
//! compile time; the server never runs them on startup.

use super::CommandError;

/// Run database migrations.
///
/// # Errors
///
/// Returns an error if `DATABASE_URL` is missing, the connection fails, or
/// a migration fails to apply.
pub async fn run() -> Result<(), CommandError> {
    let pool = super::connect().await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../admin/migrations").run(&pool).await?;

    tracing::info!("Migrations complete");
    Ok(())
}
