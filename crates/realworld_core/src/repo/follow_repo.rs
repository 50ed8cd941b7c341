//! Directed follow edges between profiles.
//!
//! # Invariants
//! - At most one edge per ordered `(follower, followee)` pair; the composite
//!   primary key backs both uniqueness and O(1) membership tests.
//! - A self edge never persists: the CHECK constraint turns the
//!   insert-or-ignore into a no-op. Services reject it before storage.

use crate::model::user::ProfileId;
use crate::repo::{RepoResult, SqliteStore};
use rusqlite::params;

pub trait FollowRepository {
    /// Inserts the edge. Returns `false` when it already existed.
    fn insert_follow(&self, follower: ProfileId, followee: ProfileId) -> RepoResult<bool>;
    /// Removes the edge. Returns `false` when there was nothing to remove.
    fn delete_follow(&self, follower: ProfileId, followee: ProfileId) -> RepoResult<bool>;
    fn is_following(&self, follower: ProfileId, followee: ProfileId) -> RepoResult<bool>;
}

impl FollowRepository for SqliteStore<'_> {
    fn insert_follow(&self, follower: ProfileId, followee: ProfileId) -> RepoResult<bool> {
        let inserted = self.connection().execute(
            "INSERT OR IGNORE INTO follows (follower_id, followee_id) VALUES (?1, ?2);",
            params![follower, followee],
        )?;
        Ok(inserted == 1)
    }

    fn delete_follow(&self, follower: ProfileId, followee: ProfileId) -> RepoResult<bool> {
        let deleted = self.connection().execute(
            "DELETE FROM follows WHERE follower_id = ?1 AND followee_id = ?2;",
            params![follower, followee],
        )?;
        Ok(deleted == 1)
    }

    fn is_following(&self, follower: ProfileId, followee: ProfileId) -> RepoResult<bool> {
        let exists: i64 = self.connection().query_row(
            "SELECT EXISTS(
                SELECT 1 FROM follows WHERE follower_id = ?1 AND followee_id = ?2
            );",
            params![follower, followee],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }
}
