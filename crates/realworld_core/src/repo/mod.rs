//! Repository layer: persistence contracts and their SQLite implementation.
//!
//! # Responsibility
//! - Define one repository trait per storage concern.
//! - Implement all of them on [`SqliteStore`], a borrowed storage handle
//!   passed explicitly into every service.
//! - Translate SQLite failures into semantic errors.
//!
//! # Invariants
//! - Multi-statement writes run in one `IMMEDIATE` transaction.
//! - Unique violations surface as `Conflict`, lock contention as `Busy`,
//!   a write against a vanished parent row as `NotFound`; raw SQLite errors
//!   never reach services for those cases.
//! - Edge inserts use insert-or-ignore, so duplicates are no-ops.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::validation::ValidationError;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod article_repo;
pub mod comment_repo;
pub mod favorite_repo;
pub mod follow_repo;
pub mod tag_repo;
pub mod user_repo;

/// SQL expression for "now" in epoch milliseconds.
pub(crate) const NOW_MS_SQL: &str =
    "CAST(ROUND((julianday('now') - 2440587.5) * 86400000) AS INTEGER)";

const REQUIRED_TABLES: &[&str] = &[
    "users",
    "profiles",
    "articles",
    "tags",
    "article_tags",
    "comments",
    "follows",
    "favorites",
];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error shared by all storage concerns.
#[derive(Debug)]
pub enum RepoError {
    /// Unclassified storage failure.
    Db(DbError),
    /// Database stayed locked past the busy timeout.
    Busy(DbError),
    /// UNIQUE or PRIMARY KEY violation, e.g. `users.email`.
    Conflict { constraint: String },
    NotFound { entity: &'static str, key: String },
    Validation(ValidationError),
    /// Persisted row cannot be mapped to a valid model.
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
}

impl RepoError {
    pub(crate) fn not_found(entity: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Busy(err) => write!(f, "storage busy: {err}"),
            Self::Conflict { constraint } => write!(f, "uniqueness conflict on {constraint}"),
            Self::NotFound { entity, key } => write!(f, "{entity} not found: {key}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "repository requires table `{table}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) | Self::Busy(err) => Some(err),
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        if value.is_busy() {
            return Self::Busy(value);
        }
        if value.is_unique_violation() {
            let constraint = match &value {
                DbError::Sqlite(rusqlite::Error::SqliteFailure(_, Some(message))) => message
                    .rsplit(": ")
                    .next()
                    .unwrap_or(message.as_str())
                    .to_string(),
                _ => "unknown".to_string(),
            };
            return Self::Conflict { constraint };
        }
        if value.is_foreign_key_violation() {
            // SQLite does not name the violated key.
            return Self::not_found("referenced row", "foreign key");
        }
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::from(DbError::Sqlite(value))
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Borrowed SQLite storage handle implementing every repository trait.
///
/// Cheap to copy; services own one per request scope.
#[derive(Debug, Clone, Copy)]
pub struct SqliteStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStore<'conn> {
    /// Wraps a connection after checking it is fully migrated.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &'conn Connection {
        self.conn
    }
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for &table in REQUIRED_TABLES {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

pub(crate) fn count_to_u64(value: i64, column: &str) -> RepoResult<u64> {
    u64::try_from(value)
        .map_err(|_| RepoError::InvalidData(format!("negative count `{value}` in {column}")))
}
