//! Platform record store for the voltlink federation core.
//!
//! Provides the [`PlatformRepository`] trait the trust engine works
//! against, plus a SQLite implementation (WAL mode, `r2d2` pooling,
//! embedded migrations). Counterparty trust records are small and hot on
//! the token-lookup path, so the single-writer/many-readers model of WAL
//! SQLite fits without an external database process.

mod migrations;
mod pool;
mod repository;

pub use migrations::run_migrations;
pub use pool::{create_pool, DbPool};
pub use repository::{authenticate, PlatformRepository, SqlitePlatformRepository, StoreError};
