//! Embedded SQL migration runner.
//!
//! Migrations are SQL files embedded at compile time and run sequentially
//! on startup, tracked in the `_voltlink_migrations` table so each one
//! runs exactly once.

use crate::StoreError;
use rusqlite::Connection;

struct Migration {
    name: &'static str,
    sql: &'static str,
}

/// All migrations in order. New migrations are appended here.
const MIGRATIONS: &[Migration] = &[Migration {
    name: "000_platforms",
    sql: include_str!("migrations/000_platforms.sql"),
}];

/// Runs all pending migrations against the given connection, returning
/// how many were applied.
pub fn run_migrations(conn: &Connection) -> Result<usize, StoreError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS _voltlink_migrations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );",
    )?;

    let mut applied = 0;
    for migration in MIGRATIONS {
        let already_applied: bool = conn.query_row(
            "SELECT COUNT(*) > 0 FROM _voltlink_migrations WHERE name = ?1",
            [migration.name],
            |row| row.get(0),
        )?;
        if already_applied {
            tracing::debug!(name = migration.name, "skipping applied migration");
            continue;
        }

        conn.execute_batch(migration.sql)?;
        conn.execute(
            "INSERT INTO _voltlink_migrations (name) VALUES (?1)",
            [migration.name],
        )?;
        tracing::info!(name = migration.name, "applied migration");
        applied += 1;
    }

    Ok(applied)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_apply_once() {
        let conn = Connection::open_in_memory().unwrap();
        let first = run_migrations(&conn).unwrap();
        assert_eq!(first, MIGRATIONS.len());

        let second = run_migrations(&conn).unwrap();
        assert_eq!(second, 0, "re-running must be a no-op");

        // The platforms table exists afterwards.
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM platforms", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }
}
