//! Comment persistence scoped to articles.
//!
//! # Invariants
//! - Comments are listed oldest first: `created_at ASC, id ASC`.
//! - Deletion matches both comment id and article id, so a comment can
//!   only be removed through the article it belongs to.

use crate::model::article::ArticleId;
use crate::model::comment::{Comment, CommentId, CommentRecord};
use crate::model::user::ProfileId;
use crate::repo::user_repo::parse_profile_row;
use crate::repo::{RepoError, RepoResult, SqliteStore};
use rusqlite::{params, OptionalExtension, Row};

const COMMENT_SELECT_SQL: &str = "SELECT
    c.id AS comment_id,
    c.body AS body,
    c.article_id AS article_id,
    c.created_at AS created_at,
    c.updated_at AS updated_at,
    p.id AS profile_id,
    p.user_id AS user_id,
    u.username AS username,
    p.bio AS bio,
    p.image AS image
FROM comments c
INNER JOIN profiles p ON p.id = c.author_id
INNER JOIN users u ON u.id = p.user_id";

pub trait CommentRepository {
    fn create_comment(
        &self,
        article: ArticleId,
        author: ProfileId,
        body: &str,
    ) -> RepoResult<CommentId>;
    fn get_comment(&self, id: CommentId) -> RepoResult<Option<CommentRecord>>;
    fn list_comments(&self, article: ArticleId) -> RepoResult<Vec<CommentRecord>>;
    /// Deletes `id` only if it belongs to `article`; otherwise `NotFound`.
    fn delete_comment(&self, article: ArticleId, id: CommentId) -> RepoResult<()>;
}

impl CommentRepository for SqliteStore<'_> {
    fn create_comment(
        &self,
        article: ArticleId,
        author: ProfileId,
        body: &str,
    ) -> RepoResult<CommentId> {
        self.connection().execute(
            "INSERT INTO comments (body, author_id, article_id) VALUES (?1, ?2, ?3);",
            params![body, author, article],
        )?;
        Ok(self.connection().last_insert_rowid())
    }

    fn get_comment(&self, id: CommentId) -> RepoResult<Option<CommentRecord>> {
        let record = self
            .connection()
            .query_row(
                &format!("{COMMENT_SELECT_SQL} WHERE c.id = ?1;"),
                [id],
                parse_comment_row,
            )
            .optional()?;
        Ok(record)
    }

    fn list_comments(&self, article: ArticleId) -> RepoResult<Vec<CommentRecord>> {
        let mut stmt = self.connection().prepare(&format!(
            "{COMMENT_SELECT_SQL}
             WHERE c.article_id = ?1
             ORDER BY c.created_at ASC, c.id ASC;"
        ))?;
        let records = stmt
            .query_map([article], parse_comment_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
    }

    fn delete_comment(&self, article: ArticleId, id: CommentId) -> RepoResult<()> {
        let changed = self.connection().execute(
            "DELETE FROM comments WHERE id = ?1 AND article_id = ?2;",
            params![id, article],
        )?;
        if changed == 0 {
            return Err(RepoError::not_found("comment", id));
        }
        Ok(())
    }
}

fn parse_comment_row(row: &Row<'_>) -> rusqlite::Result<CommentRecord> {
    let author = parse_profile_row(row)?;
    Ok(CommentRecord {
        comment: Comment {
            id: row.get("comment_id")?,
            body: row.get("body")?,
            author_id: author.id,
            article_id: row.get("article_id")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        },
        author,
    })
}
