//! Embedded schema migrations.

use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

use crate::error::{DbError, DbResult};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// ## Summary
/// Runs all pending migrations against the given connection.
///
/// ## Errors
/// Returns an error if a migration fails to apply.
pub fn run_pending(conn: &mut PgConnection) -> DbResult<()> {
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| DbError::MigrationError(err.to_string()))?;

    for version in &applied {
        tracing::info!(migration = %version, "Applied migration");
    }

    Ok(())
}
