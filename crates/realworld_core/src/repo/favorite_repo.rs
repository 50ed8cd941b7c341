//! Favorite edges between profiles and articles.
//!
//! # Invariants
//! - At most one edge per `(profile, article)` pair.
//! - Edges disappear with either endpoint through cascading deletes.

use crate::model::article::ArticleId;
use crate::model::user::ProfileId;
use crate::repo::{count_to_u64, RepoResult, SqliteStore};
use rusqlite::params;

pub trait FavoriteRepository {
    /// Inserts the edge. Returns `false` when it already existed.
    fn insert_favorite(&self, profile: ProfileId, article: ArticleId) -> RepoResult<bool>;
    /// Removes the edge. Returns `false` when there was nothing to remove.
    fn delete_favorite(&self, profile: ProfileId, article: ArticleId) -> RepoResult<bool>;
    fn is_favorited(&self, profile: ProfileId, article: ArticleId) -> RepoResult<bool>;
    fn favorite_count(&self, article: ArticleId) -> RepoResult<u64>;
}

impl FavoriteRepository for SqliteStore<'_> {
    fn insert_favorite(&self, profile: ProfileId, article: ArticleId) -> RepoResult<bool> {
        let inserted = self.connection().execute(
            "INSERT OR IGNORE INTO favorites (profile_id, article_id) VALUES (?1, ?2);",
            params![profile, article],
        )?;
        Ok(inserted == 1)
    }

    fn delete_favorite(&self, profile: ProfileId, article: ArticleId) -> RepoResult<bool> {
        let deleted = self.connection().execute(
            "DELETE FROM favorites WHERE profile_id = ?1 AND article_id = ?2;",
            params![profile, article],
        )?;
        Ok(deleted == 1)
    }

    fn is_favorited(&self, profile: ProfileId, article: ArticleId) -> RepoResult<bool> {
        let exists: i64 = self.connection().query_row(
            "SELECT EXISTS(
                SELECT 1 FROM favorites WHERE profile_id = ?1 AND article_id = ?2
            );",
            params![profile, article],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn favorite_count(&self, article: ArticleId) -> RepoResult<u64> {
        let count: i64 = self.connection().query_row(
            "SELECT COUNT(*) FROM favorites WHERE article_id = ?1;",
            [article],
            |row| row.get(0),
        )?;
        count_to_u64(count, "favorites")
    }
}
