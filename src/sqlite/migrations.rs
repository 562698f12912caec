//! Embedded `SQLite` migrations for the invitation store.
//!
//! # Example
//!
//! ```rust,ignore
//! use rosterly::sqlite::migrations;
//! use sqlx::SqlitePool;
//!
//! async fn setup_database(pool: &SqlitePool) -> Result<(), sqlx::Error> {
//!     migrations::run(pool).await?;
//!     Ok(())
//! }
//! ```

use sqlx::{Executor, SqlitePool};

const MIGRATIONS: &[(&str, &str)] = &[
    (
        "20250301000001_create_team_invitations_table",
        include_str!("../../migrations_sqlite/20250301000001_create_team_invitations_table.sql"),
    ),
    (
        "20250301000002_create_team_invitations_indexes",
        include_str!("../../migrations_sqlite/20250301000002_create_team_invitations_indexes.sql"),
    ),
];

/// Applies pending migrations in order, recording each in `_rosterly_migrations`.
///
/// Safe to call on every startup.
pub async fn run(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    pool.execute(
        r"
        CREATE TABLE IF NOT EXISTS _rosterly_migrations (
            name TEXT PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        )
        ",
    )
    .await?;

    for (name, sql) in MIGRATIONS {
        let applied: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM _rosterly_migrations WHERE name = ?)")
                .bind(*name)
                .fetch_one(pool)
                .await?;
        if applied {
            continue;
        }

        let mut tx = pool.begin().await?;
        // bundled migrations contain no semicolons inside literals
        for statement in sql.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            sqlx::query(statement).execute(&mut *tx).await?;
        }
        sqlx::query("INSERT INTO _rosterly_migrations (name) VALUES (?)")
            .bind(*name)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        log::info!(target: "rosterly", "msg=\"migration applied\", name=\"{name}\"");
    }

    Ok(())
}
