//! Tag resolution and article/tag links.
//!
//! # Invariants
//! - `tags.name` is unique; resolution is insert-or-ignore followed by a
//!   read inside one immediate transaction, so concurrent resolvers with
//!   overlapping names never create duplicate rows.
//! - Article tag links keep the order in which tags were attached.
//! - Tags outlive the articles that reference them.

use crate::model::article::ArticleId;
use crate::model::tag::Tag;
use crate::repo::{RepoResult, SqliteStore};
use rusqlite::{params, Connection, Transaction, TransactionBehavior};

pub trait TagRepository {
    /// Returns one tag per name, creating the missing ones.
    ///
    /// `names` must already be normalized and distinct; output order
    /// follows input order.
    fn resolve_tags(&self, names: &[String]) -> RepoResult<Vec<Tag>>;
    /// All tag names, sorted by name.
    fn list_tags(&self) -> RepoResult<Vec<String>>;
    /// Names linked to `article` in attach order; empty for unknown ids.
    fn tags_for_article(&self, article: ArticleId) -> RepoResult<Vec<String>>;
}

impl TagRepository for SqliteStore<'_> {
    fn resolve_tags(&self, names: &[String]) -> RepoResult<Vec<Tag>> {
        if names.is_empty() {
            return Ok(Vec::new());
        }
        let tx = Transaction::new_unchecked(self.connection(), TransactionBehavior::Immediate)?;
        let tags = resolve_tags_in(&tx, names)?;
        tx.commit()?;
        Ok(tags)
    }

    fn list_tags(&self) -> RepoResult<Vec<String>> {
        let mut stmt = self
            .connection()
            .prepare("SELECT name FROM tags ORDER BY name ASC;")?;
        let mut rows = stmt.query([])?;
        let mut names = Vec::new();
        while let Some(row) = rows.next()? {
            names.push(row.get("name")?);
        }
        Ok(names)
    }

    fn tags_for_article(&self, article: ArticleId) -> RepoResult<Vec<String>> {
        load_article_tags(self.connection(), article)
    }
}

/// Resolves names on a connection that is already inside a transaction.
pub(crate) fn resolve_tags_in(conn: &Connection, names: &[String]) -> RepoResult<Vec<Tag>> {
    let mut insert = conn.prepare_cached("INSERT OR IGNORE INTO tags (name) VALUES (?1);")?;
    let mut select = conn.prepare_cached("SELECT id, name FROM tags WHERE name = ?1;")?;
    let mut tags = Vec::with_capacity(names.len());
    for name in names {
        insert.execute([name.as_str()])?;
        let tag = select.query_row([name.as_str()], |row| {
            Ok(Tag {
                id: row.get("id")?,
                name: row.get("name")?,
            })
        })?;
        tags.push(tag);
    }
    Ok(tags)
}

/// Links `tags` to `article` in slice order.
pub(crate) fn attach_tags_in(conn: &Connection, article: ArticleId, tags: &[Tag]) -> RepoResult<()> {
    let mut insert = conn.prepare_cached(
        "INSERT OR IGNORE INTO article_tags (article_id, tag_id, position) VALUES (?1, ?2, ?3);",
    )?;
    for (position, tag) in tags.iter().enumerate() {
        insert.execute(params![article, tag.id, position as i64])?;
    }
    Ok(())
}

pub(crate) fn load_article_tags(conn: &Connection, article: ArticleId) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare_cached(
        "SELECT t.name
         FROM article_tags at
         INNER JOIN tags t ON t.id = at.tag_id
         WHERE at.article_id = ?1
         ORDER BY at.position ASC;",
    )?;
    let mut rows = stmt.query([article])?;
    let mut names = Vec::new();
    while let Some(row) = rows.next()? {
        names.push(row.get(0)?);
    }
    Ok(names)
}
