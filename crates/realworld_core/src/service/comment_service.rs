//! Comment use-cases on a single article.
//!
//! # Invariants
//! - Comments are addressed through their article's slug; a comment id
//!   from another article is reported as `NotFound`.
//! - Only the comment author may delete it.

use crate::model::article::ArticleRecord;
use crate::model::comment::CommentId;
use crate::model::validation::require_text;
use crate::model::view::CommentView;
use crate::model::viewer::Viewer;
use crate::repo::article_repo::ArticleRepository;
use crate::repo::comment_repo::CommentRepository;
use crate::repo::follow_repo::FollowRepository;
use crate::repo::user_repo::UserRepository;
use crate::service::decorate::comment_view;
use crate::service::error::{ServiceError, ServiceResult};
use crate::service::{require_existing_profile, require_profile};
use log::info;

pub struct CommentService<S> {
    store: S,
}

impl<S> CommentService<S>
where
    S: ArticleRepository + CommentRepository + FollowRepository + UserRepository,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Adds a comment by the viewer to the article at `slug`.
    pub fn add(&self, viewer: Viewer, slug: &str, body: &str) -> ServiceResult<CommentView> {
        let author = require_existing_profile(&self.store, viewer)?;
        let body = require_text("body", body)?;
        let article = self.load_article(slug)?;
        let comment_id = self
            .store
            .create_comment(article.article.id, author, &body)?;
        info!(
            "event=comment_add module=comment status=ok article={} comment={comment_id}",
            article.article.id
        );
        let record = self
            .store
            .get_comment(comment_id)?
            .ok_or_else(|| ServiceError::not_found("comment", comment_id))?;
        Ok(comment_view(&self.store, viewer, record)?)
    }

    /// Deletes one of the viewer's comments on the article at `slug`.
    pub fn remove(&self, viewer: Viewer, slug: &str, comment_id: CommentId) -> ServiceResult<()> {
        let profile = require_profile(viewer)?;
        let article = self.load_article(slug)?;
        let record = self
            .store
            .get_comment(comment_id)?
            .filter(|record| record.comment.article_id == article.article.id)
            .ok_or_else(|| ServiceError::not_found("comment", comment_id))?;
        if record.comment.author_id != profile {
            return Err(ServiceError::Forbidden(format!(
                "comment {comment_id} belongs to another author"
            )));
        }
        self.store.delete_comment(article.article.id, comment_id)?;
        info!(
            "event=comment_remove module=comment status=ok article={} comment={comment_id}",
            article.article.id
        );
        Ok(())
    }

    /// Lists the article's comments, oldest first.
    pub fn list_for_article(&self, slug: &str, viewer: Viewer) -> ServiceResult<Vec<CommentView>> {
        let article = self.load_article(slug)?;
        let records = self.store.list_comments(article.article.id)?;
        let mut views = Vec::with_capacity(records.len());
        for record in records {
            views.push(comment_view(&self.store, viewer, record)?);
        }
        Ok(views)
    }

    fn load_article(&self, slug: &str) -> ServiceResult<ArticleRecord> {
        self.store
            .get_article_by_slug(slug)?
            .ok_or_else(|| ServiceError::not_found("article", slug))
    }
}
