//! Article use-cases: create, read, update, delete, favorite.
//!
//! # Invariants
//! - Slugs are never pre-checked; a collision reported by the unique index
//!   triggers regeneration, up to `CoreConfig::slug_max_attempts` times.
//! - Only the author may update or delete an article.
//! - A title change yields a fresh slug; the old slug stops resolving.
//! - An update with no fields leaves `updated_at` untouched.

use crate::config::CoreConfig;
use crate::model::article::{ArticleChanges, ArticleId, ArticleRecord, NewArticle};
use crate::model::user::ProfileId;
use crate::model::view::ArticleView;
use crate::model::viewer::Viewer;
use crate::repo::article_repo::ArticleRepository;
use crate::repo::favorite_repo::FavoriteRepository;
use crate::repo::follow_repo::FollowRepository;
use crate::repo::user_repo::UserRepository;
use crate::repo::RepoError;
use crate::service::decorate::article_view;
use crate::service::error::{ServiceError, ServiceResult};
use crate::service::favorite_service::FavoriteService;
use crate::service::{require_existing_profile, require_profile};
use crate::slug::{RandomSuffixSlugGenerator, SlugGenerator};
use log::{info, warn};

const SLUG_CONSTRAINT: &str = "articles.slug";

pub struct ArticleService<S> {
    store: S,
    config: CoreConfig,
    slugs: Box<dyn SlugGenerator>,
}

impl<S> ArticleService<S>
where
    S: ArticleRepository + UserRepository + FollowRepository + FavoriteRepository + Clone,
{
    pub fn new(store: S) -> Self {
        Self::with_config(store, CoreConfig::default())
    }

    pub fn with_config(store: S, config: CoreConfig) -> Self {
        Self {
            store,
            config: config.normalized(),
            slugs: Box::new(RandomSuffixSlugGenerator),
        }
    }

    /// Replaces the slug source, e.g. with a deterministic one.
    pub fn with_slug_generator(mut self, slugs: impl SlugGenerator + 'static) -> Self {
        self.slugs = Box::new(slugs);
        self
    }

    /// Publishes a new article authored by the viewer.
    pub fn create_article(&self, viewer: Viewer, article: &NewArticle) -> ServiceResult<ArticleView> {
        let author = require_existing_profile(&self.store, viewer)?;
        let article = article.normalized()?;

        let attempts = self.config.slug_max_attempts;
        for attempt in 1..=attempts {
            let slug = self.slugs.generate(&article.title)?;
            match self.store.create_article(author, &article, &slug) {
                Ok(article_id) => {
                    info!(
                        "event=article_create module=article status=ok article={article_id} author={author} tags={} attempt={attempt}",
                        article.tags.len()
                    );
                    return self.view_by_id(article_id, viewer);
                }
                Err(RepoError::Conflict { constraint }) if constraint == SLUG_CONSTRAINT => {
                    warn!("event=article_create module=article status=retry reason=slug_conflict attempt={attempt}");
                }
                Err(err) => return Err(err.into()),
            }
        }
        Err(ServiceError::Conflict(SLUG_CONSTRAINT.to_string()))
    }

    pub fn get_article(&self, slug: &str, viewer: Viewer) -> ServiceResult<ArticleView> {
        let record = self.load_by_slug(slug)?;
        Ok(article_view(&self.store, viewer, record)?)
    }

    /// Updates title, description and/or body of the viewer's own article.
    pub fn update_article(
        &self,
        viewer: Viewer,
        slug: &str,
        changes: &ArticleChanges,
    ) -> ServiceResult<ArticleView> {
        let profile = require_profile(viewer)?;
        let record = self.load_by_slug(slug)?;
        ensure_author(&record, profile)?;
        let changes = changes.normalized()?;
        if changes.is_empty() {
            return Ok(article_view(&self.store, viewer, record)?);
        }

        let article_id = record.article.id;
        match changes.title.as_deref() {
            Some(title) if title != record.article.title => {
                self.update_with_fresh_slug(article_id, title, &changes)?;
            }
            _ => self.store.update_article(article_id, &changes, None)?,
        }
        info!("event=article_update module=article status=ok article={article_id}");
        self.view_by_id(article_id, viewer)
    }

    /// Deletes the viewer's own article with its comments, favorites and tag links.
    pub fn delete_article(&self, viewer: Viewer, slug: &str) -> ServiceResult<()> {
        let profile = require_profile(viewer)?;
        let record = self.load_by_slug(slug)?;
        ensure_author(&record, profile)?;
        self.store.delete_article(record.article.id)?;
        info!(
            "event=article_delete module=article status=ok article={}",
            record.article.id
        );
        Ok(())
    }

    pub fn favorite_article(&self, viewer: Viewer, slug: &str) -> ServiceResult<ArticleView> {
        let profile = require_existing_profile(&self.store, viewer)?;
        let record = self.load_by_slug(slug)?;
        self.favorites().favorite(profile, record.article.id)?;
        self.view_by_id(record.article.id, viewer)
    }

    pub fn unfavorite_article(&self, viewer: Viewer, slug: &str) -> ServiceResult<ArticleView> {
        let profile = require_existing_profile(&self.store, viewer)?;
        let record = self.load_by_slug(slug)?;
        self.favorites().unfavorite(profile, record.article.id)?;
        self.view_by_id(record.article.id, viewer)
    }

    fn update_with_fresh_slug(
        &self,
        article_id: ArticleId,
        title: &str,
        changes: &ArticleChanges,
    ) -> ServiceResult<()> {
        let attempts = self.config.slug_max_attempts;
        for attempt in 1..=attempts {
            let slug = self.slugs.generate(title)?;
            match self.store.update_article(article_id, changes, Some(&slug)) {
                Ok(()) => return Ok(()),
                Err(RepoError::Conflict { constraint }) if constraint == SLUG_CONSTRAINT => {
                    warn!("event=article_update module=article status=retry reason=slug_conflict attempt={attempt}");
                }
                Err(err) => return Err(err.into()),
            }
        }
        Err(ServiceError::Conflict(SLUG_CONSTRAINT.to_string()))
    }

    fn load_by_slug(&self, slug: &str) -> ServiceResult<ArticleRecord> {
        self.store
            .get_article_by_slug(slug)?
            .ok_or_else(|| ServiceError::not_found("article", slug))
    }

    fn view_by_id(&self, id: ArticleId, viewer: Viewer) -> ServiceResult<ArticleView> {
        let record = self
            .store
            .get_article(id)?
            .ok_or_else(|| ServiceError::not_found("article", id))?;
        Ok(article_view(&self.store, viewer, record)?)
    }

    fn favorites(&self) -> FavoriteService<S> {
        FavoriteService::new(self.store.clone())
    }
}

fn ensure_author(record: &ArticleRecord, profile: ProfileId) -> ServiceResult<()> {
    if record.article.author_id != profile {
        return Err(ServiceError::Forbidden(format!(
            "article `{}` belongs to another author",
            record.article.slug
        )));
    }
    Ok(())
}
