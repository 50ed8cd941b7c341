//! SQLite migration registry and executor.
//!
//! Schema layout:
//! - `0001_identity`: `users` and their 1:1 `profiles`; a profile row
//!   cascades away with its user.
//! - `0002_articles`: `articles`, `tags`, ordered `article_tags` links and
//!   `comments`. Deleting a profile deletes its articles and comments;
//!   deleting an article deletes its links and comments. Tags are never
//!   deleted, so `article_tags.tag_id` has no cascade.
//! - `0003_social`: `follows` and `favorites` edge tables, `WITHOUT ROWID`
//!   and keyed by their pair, so the primary key alone makes re-inserting
//!   an edge a no-op. `follows` rejects self-edges with a `CHECK`.
//!
//! # Invariants
//! - `version` values must remain monotonic.
//! - Applied migration version is mirrored to `PRAGMA user_version`.
//! - All pending migrations apply in one transaction or not at all.
//! - A migration only references tables created by an earlier version:
//!   `0003_social` depends on `profiles` (0001) and `articles` (0002).
//! - Foreign keys are enforced by the connection (`PRAGMA foreign_keys`),
//!   not by the migrations; every `REFERENCES` clause relies on it.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        sql: include_str!("0001_identity.sql"),
    },
    Migration {
        version: 2,
        sql: include_str!("0002_articles.sql"),
    },
    Migration {
        version: 3,
        sql: include_str!("0003_social.sql"),
    },
];

/// Returns the latest migration version known by this binary.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Applies all pending migrations on the provided connection.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let current_version = current_user_version(conn)?;
    let latest = latest_version();

    if current_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current_version,
            latest_supported: latest,
        });
    }

    if current_version == latest {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for migration in MIGRATIONS
        .iter()
        .filter(|migration| migration.version > current_version)
    {
        tx.execute_batch(migration.sql)?;
        tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))?;
    }
    tx.commit()?;
    info!("event=db_migrate module=db status=ok from={current_version} to={latest}");

    Ok(())
}

/// Reads `PRAGMA user_version` from the connection.
pub fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
