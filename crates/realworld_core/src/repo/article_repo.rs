//! Article persistence and the filtered article query.
//!
//! # Responsibility
//! - Insert articles together with their tag links in one transaction.
//! - Run the AND-composed, ordered, paginated article listing.
//!
//! # Invariants
//! - Listing order is `created_at DESC, id DESC`; ids grow with insertion
//!   order, so pages are deterministic even for equal timestamps.
//! - A slug collision is reported as `Conflict`, never overwritten.
//! - `updated_at` is written only by `update_article`.
//! - A page and its total are read inside one deferred transaction, so the
//!   count never disagrees with the rows a concurrent writer left behind.

use crate::model::article::{Article, ArticleChanges, ArticleId, ArticleRecord, NewArticle};
use crate::model::user::ProfileId;
use crate::repo::tag_repo::{attach_tags_in, load_article_tags, resolve_tags_in};
use crate::repo::user_repo::parse_profile_row;
use crate::repo::{count_to_u64, RepoError, RepoResult, SqliteStore, NOW_MS_SQL};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use rusqlite::{Transaction, TransactionBehavior};

const ARTICLE_SELECT_SQL: &str = "SELECT
    a.id AS article_id,
    a.slug AS slug,
    a.title AS title,
    a.description AS description,
    a.body AS body,
    a.created_at AS created_at,
    a.updated_at AS updated_at,
    p.id AS profile_id,
    p.user_id AS user_id,
    u.username AS username,
    p.bio AS bio,
    p.image AS image,
    (SELECT COUNT(*) FROM favorites f WHERE f.article_id = a.id) AS favorites_count
FROM articles a
INNER JOIN profiles p ON p.id = a.author_id
INNER JOIN users u ON u.id = p.user_id";

/// Resolved filters for one listing. All present filters must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleListQuery {
    /// Exact tag name.
    pub tag: Option<String>,
    pub author: Option<ProfileId>,
    /// Only articles this profile favorited.
    pub favorited_by: Option<ProfileId>,
    /// Only articles whose author this profile follows.
    pub followed_by: Option<ProfileId>,
    pub limit: u32,
    pub offset: u32,
}

pub trait ArticleRepository {
    /// Inserts the article and links its (already normalized) tags.
    fn create_article(
        &self,
        author: ProfileId,
        article: &NewArticle,
        slug: &str,
    ) -> RepoResult<ArticleId>;
    fn get_article(&self, id: ArticleId) -> RepoResult<Option<ArticleRecord>>;
    fn get_article_by_slug(&self, slug: &str) -> RepoResult<Option<ArticleRecord>>;
    fn article_exists(&self, id: ArticleId) -> RepoResult<bool>;
    /// Applies `changes`, optionally switching to `new_slug`, and stamps `updated_at`.
    fn update_article(
        &self,
        id: ArticleId,
        changes: &ArticleChanges,
        new_slug: Option<&str>,
    ) -> RepoResult<()>;
    /// Deletes the article; comments, favorites and tag links cascade.
    fn delete_article(&self, id: ArticleId) -> RepoResult<()>;
    fn list_articles(&self, query: &ArticleListQuery) -> RepoResult<Vec<ArticleRecord>>;
    /// Counts matches for `query`, ignoring `limit` and `offset`.
    fn count_articles(&self, query: &ArticleListQuery) -> RepoResult<u64>;
    /// One page of `query` plus the unpaginated total, read from one snapshot.
    fn list_articles_page(
        &self,
        query: &ArticleListQuery,
    ) -> RepoResult<(Vec<ArticleRecord>, u64)>;
}

impl ArticleRepository for SqliteStore<'_> {
    fn create_article(
        &self,
        author: ProfileId,
        article: &NewArticle,
        slug: &str,
    ) -> RepoResult<ArticleId> {
        let tx = Transaction::new_unchecked(self.connection(), TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO articles (slug, title, description, body, author_id)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                slug,
                article.title.as_str(),
                article.description.as_str(),
                article.body.as_str(),
                author,
            ],
        )?;
        let article_id = tx.last_insert_rowid();
        let tags = resolve_tags_in(&tx, &article.tags)?;
        attach_tags_in(&tx, article_id, &tags)?;
        tx.commit()?;
        Ok(article_id)
    }

    fn get_article(&self, id: ArticleId) -> RepoResult<Option<ArticleRecord>> {
        load_one(self.connection(), "a.id = ?1", Value::Integer(id))
    }

    fn get_article_by_slug(&self, slug: &str) -> RepoResult<Option<ArticleRecord>> {
        load_one(self.connection(), "a.slug = ?1", Value::Text(slug.to_string()))
    }

    fn article_exists(&self, id: ArticleId) -> RepoResult<bool> {
        let exists: i64 = self.connection().query_row(
            "SELECT EXISTS(SELECT 1 FROM articles WHERE id = ?1);",
            [id],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn update_article(
        &self,
        id: ArticleId,
        changes: &ArticleChanges,
        new_slug: Option<&str>,
    ) -> RepoResult<()> {
        let changed = self.connection().execute(
            &format!(
                "UPDATE articles
                 SET
                    slug = COALESCE(?2, slug),
                    title = COALESCE(?3, title),
                    description = COALESCE(?4, description),
                    body = COALESCE(?5, body),
                    updated_at = {NOW_MS_SQL}
                 WHERE id = ?1;"
            ),
            params![
                id,
                new_slug,
                changes.title.as_deref(),
                changes.description.as_deref(),
                changes.body.as_deref(),
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::not_found("article", id));
        }
        Ok(())
    }

    fn delete_article(&self, id: ArticleId) -> RepoResult<()> {
        let changed = self
            .connection()
            .execute("DELETE FROM articles WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::not_found("article", id));
        }
        Ok(())
    }

    fn list_articles(&self, query: &ArticleListQuery) -> RepoResult<Vec<ArticleRecord>> {
        if query.limit == 0 {
            return Ok(Vec::new());
        }

        let (where_sql, mut bind_values) = build_filters(query);
        let sql = format!(
            "{ARTICLE_SELECT_SQL}{where_sql} ORDER BY a.created_at DESC, a.id DESC LIMIT ? OFFSET ?;"
        );
        bind_values.push(Value::Integer(i64::from(query.limit)));
        bind_values.push(Value::Integer(i64::from(query.offset)));

        let conn = self.connection();
        let mut stmt = conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(parse_article_row(conn, row)?);
        }
        Ok(records)
    }

    fn count_articles(&self, query: &ArticleListQuery) -> RepoResult<u64> {
        let (where_sql, bind_values) = build_filters(query);
        let count: i64 = self.connection().query_row(
            &format!("SELECT COUNT(*) FROM articles a{where_sql};"),
            params_from_iter(bind_values),
            |row| row.get(0),
        )?;
        count_to_u64(count, "articles")
    }

    fn list_articles_page(
        &self,
        query: &ArticleListQuery,
    ) -> RepoResult<(Vec<ArticleRecord>, u64)> {
        let tx = Transaction::new_unchecked(self.connection(), TransactionBehavior::Deferred)?;
        let records = self.list_articles(query)?;
        let total = self.count_articles(query)?;
        tx.commit()?;
        Ok((records, total))
    }
}

/// Builds the ` WHERE ...` suffix shared by listing and counting.
fn build_filters(query: &ArticleListQuery) -> (String, Vec<Value>) {
    let mut clauses: Vec<&str> = Vec::new();
    let mut bind_values = Vec::new();

    if let Some(tag) = query.tag.as_ref() {
        clauses.push(
            "EXISTS (
                SELECT 1
                FROM article_tags at
                INNER JOIN tags t ON t.id = at.tag_id
                WHERE at.article_id = a.id AND t.name = ?
            )",
        );
        bind_values.push(Value::Text(tag.clone()));
    }
    if let Some(author) = query.author {
        clauses.push("a.author_id = ?");
        bind_values.push(Value::Integer(author));
    }
    if let Some(profile) = query.favorited_by {
        clauses.push(
            "EXISTS (
                SELECT 1 FROM favorites f WHERE f.article_id = a.id AND f.profile_id = ?
            )",
        );
        bind_values.push(Value::Integer(profile));
    }
    if let Some(follower) = query.followed_by {
        clauses.push("a.author_id IN (SELECT followee_id FROM follows WHERE follower_id = ?)");
        bind_values.push(Value::Integer(follower));
    }

    if clauses.is_empty() {
        (String::new(), bind_values)
    } else {
        (format!(" WHERE {}", clauses.join(" AND ")), bind_values)
    }
}

fn load_one(conn: &Connection, predicate: &str, key: Value) -> RepoResult<Option<ArticleRecord>> {
    let mut stmt = conn.prepare(&format!("{ARTICLE_SELECT_SQL} WHERE {predicate};"))?;
    let mut rows = stmt.query([key])?;
    match rows.next()? {
        Some(row) => Ok(Some(parse_article_row(conn, row)?)),
        None => Ok(None),
    }
}

fn parse_article_row(conn: &Connection, row: &Row<'_>) -> RepoResult<ArticleRecord> {
    let article = Article {
        id: row.get("article_id")?,
        slug: row.get("slug")?,
        title: row.get("title")?,
        description: row.get("description")?,
        body: row.get("body")?,
        author_id: row.get("profile_id")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    };
    let author = parse_profile_row(row)?;
    let favorites_count = count_to_u64(row.get("favorites_count")?, "favorites")?;
    let tags = load_article_tags(conn, article.id)?;
    Ok(ArticleRecord {
        article,
        author,
        tags,
        favorites_count,
    })
}

