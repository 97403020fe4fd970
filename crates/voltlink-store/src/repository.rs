//! The platform record repository: trait and SQLite implementation.

use crate::pool::DbPool;
use rusqlite::{params, Row};
use voltlink_types::{CredentialsRole, Platform, RegistrationStatus};

/// Errors surfaced by the platform record store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A database operation failed.
    #[error("store database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The connection pool could not hand out a connection.
    #[error("store pool error: {0}")]
    Pool(#[from] r2d2::Error),

    /// JSON (de)serialization of a stored column failed.
    #[error("store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A stored value could not be interpreted.
    #[error("corrupt platform record: {0}")]
    Corrupt(String),
}

/// CRUD-style access to counterparty trust records.
///
/// `find_by_token` is the identity-resolution path for inbound calls: a
/// caller's identity is unknown until its bearer token matches a stored
/// bootstrap or inbound token. `find_by_url` is reserved for callers whose
/// identity is already established.
pub trait PlatformRepository: Send + Sync {
    fn find_by_url(&self, url: &str) -> Result<Option<Platform>, StoreError>;
    fn find_by_token(&self, token: &str) -> Result<Option<Platform>, StoreError>;
    fn upsert(&self, platform: &Platform) -> Result<(), StoreError>;
    fn delete(&self, url: &str) -> Result<(), StoreError>;
}

/// SQLite-backed platform repository over a connection pool.
#[derive(Clone)]
pub struct SqlitePlatformRepository {
    pool: DbPool,
}

impl SqlitePlatformRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

const PLATFORM_COLUMNS: &str =
    "url, token_a, inbound_token, outbound_token, remote_version_url, remote_roles, status";

fn status_label(status: RegistrationStatus) -> &'static str {
    match status {
        RegistrationStatus::Unregistered => "UNREGISTERED",
        RegistrationStatus::Registering => "REGISTERING",
        RegistrationStatus::Registered => "REGISTERED",
        RegistrationStatus::Deleting => "DELETING",
    }
}

fn parse_status(label: &str) -> Result<RegistrationStatus, StoreError> {
    match label {
        "UNREGISTERED" => Ok(RegistrationStatus::Unregistered),
        "REGISTERING" => Ok(RegistrationStatus::Registering),
        "REGISTERED" => Ok(RegistrationStatus::Registered),
        "DELETING" => Ok(RegistrationStatus::Deleting),
        other => Err(StoreError::Corrupt(format!(
            "unknown registration status '{other}'"
        ))),
    }
}

fn platform_from_row(row: &Row<'_>) -> Result<Platform, StoreError> {
    let roles_json: String = row.get(5)?;
    let remote_roles: Vec<CredentialsRole> = serde_json::from_str(&roles_json)?;
    let status_text: String = row.get(6)?;

    Ok(Platform {
        url: row.get(0)?,
        token_a: row.get(1)?,
        inbound_token: row.get(2)?,
        outbound_token: row.get(3)?,
        remote_version_url: row.get(4)?,
        remote_roles,
        status: parse_status(&status_text)?,
    })
}

impl PlatformRepository for SqlitePlatformRepository {
    fn find_by_url(&self, url: &str) -> Result<Option<Platform>, StoreError> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {PLATFORM_COLUMNS} FROM platforms WHERE url = ?1"
        ))?;
        let mut rows = stmt.query(params![url])?;
        match rows.next()? {
            Some(row) => Ok(Some(platform_from_row(row)?)),
            None => Ok(None),
        }
    }

    fn find_by_token(&self, token: &str) -> Result<Option<Platform>, StoreError> {
        // Empty tokens never authenticate, even if a half-seeded record
        // happened to store an empty string.
        if token.is_empty() {
            return Ok(None);
        }
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {PLATFORM_COLUMNS} FROM platforms
             WHERE token_a = ?1 OR inbound_token = ?1"
        ))?;
        let mut rows = stmt.query(params![token])?;
        match rows.next()? {
            Some(row) => {
                // The SQL predicate is only the index; the record's own
                // token rules decide the match.
                let platform = platform_from_row(row)?;
                Ok(platform.accepts_token(token).then_some(platform))
            }
            None => Ok(None),
        }
    }

    fn upsert(&self, platform: &Platform) -> Result<(), StoreError> {
        let roles_json = serde_json::to_string(&platform.remote_roles)?;
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO platforms (
                url, token_a, inbound_token, outbound_token,
                remote_version_url, remote_roles, status
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT(url) DO UPDATE SET
                token_a = excluded.token_a,
                inbound_token = excluded.inbound_token,
                outbound_token = excluded.outbound_token,
                remote_version_url = excluded.remote_version_url,
                remote_roles = excluded.remote_roles,
                status = excluded.status,
                updated_at = datetime('now')",
            params![
                platform.url,
                platform.token_a,
                platform.inbound_token,
                platform.outbound_token,
                platform.remote_version_url,
                roles_json,
                status_label(platform.status),
            ],
        )?;
        Ok(())
    }

    fn delete(&self, url: &str) -> Result<(), StoreError> {
        let conn = self.pool.get()?;
        conn.execute("DELETE FROM platforms WHERE url = ?1", params![url])?;
        Ok(())
    }
}

/// Convenience for inbound authentication: resolves the platform matching
/// an optionally present bearer token.
pub fn authenticate(
    repository: &dyn PlatformRepository,
    token: Option<&str>,
) -> Result<Option<Platform>, StoreError> {
    match token {
        Some(token) => repository.find_by_token(token),
        None => Ok(None),
    }
}
