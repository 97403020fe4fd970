//! SQLite connection pool for the platform record store.

use crate::StoreError;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::OpenFlags;

/// A type alias for the SQLite connection pool.
pub type DbPool = Pool<SqliteConnectionManager>;

/// Opens a pooled SQLite database in WAL mode.
///
/// Use `:memory:` as the path for an in-memory database (useful for
/// testing). WAL allows concurrent readers with a single writer, which
/// matches the access pattern of the record store: many token lookups,
/// rare handshake writes.
pub fn create_pool(db_path: &str, max_size: u32) -> Result<DbPool, StoreError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_FULL_MUTEX;

    let manager = SqliteConnectionManager::file(db_path)
        .with_flags(flags)
        .with_init(|conn| {
            // In-memory databases report "memory" instead of "wal"; both
            // are acceptable.
            let _mode: String =
                conn.query_row("PRAGMA journal_mode = WAL;", [], |row| row.get(0))?;
            conn.execute_batch(
                "PRAGMA foreign_keys = ON;
                 PRAGMA busy_timeout = 5000;",
            )
        });

    let pool = Pool::builder().max_size(max_size).build(manager)?;
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_in_memory_pool() {
        let pool = create_pool(":memory:", 3).expect("pool creation should succeed");
        assert_eq!(pool.max_size(), 3);

        let conn = pool.get().expect("should get a connection");
        let mode: String = conn
            .query_row("PRAGMA journal_mode;", [], |row| row.get(0))
            .expect("should query journal_mode");
        assert!(mode == "wal" || mode == "memory", "unexpected mode: {mode}");
    }
}
