//! Feed query engine: filtered listings and the follow-based feed.
//!
//! # Responsibility
//! - Resolve username filters to profile ids before querying.
//! - Apply page defaults and caps from [`CoreConfig`].
//! - Decorate every result for the viewer.
//!
//! # Invariants
//! - Filters are AND-composed; absent filters do not constrain.
//! - An unknown author or favoriting username is `NotFound`; an unknown
//!   tag simply matches nothing.
//! - Order is `created_at DESC, id DESC` for every listing.

use crate::config::CoreConfig;
use crate::model::article::ArticleRecord;
use crate::model::user::ProfileId;
use crate::model::view::{ArticleList, ArticleView};
use crate::model::viewer::Viewer;
use crate::repo::article_repo::{ArticleListQuery, ArticleRepository};
use crate::repo::favorite_repo::FavoriteRepository;
use crate::repo::follow_repo::FollowRepository;
use crate::repo::user_repo::UserRepository;
use crate::service::decorate::article_view;
use crate::service::error::{ServiceError, ServiceResult};
use crate::service::require_profile;
use log::debug;

/// Optional listing filters, addressed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleFilters {
    pub tag: Option<String>,
    /// Author username.
    pub author: Option<String>,
    /// Username whose favorites to list.
    pub favorited_by: Option<String>,
}

impl ArticleFilters {
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn author(mut self, username: impl Into<String>) -> Self {
        self.author = Some(username.into());
        self
    }

    pub fn favorited_by(mut self, username: impl Into<String>) -> Self {
        self.favorited_by = Some(username.into());
        self
    }
}

/// Offset pagination. `limit: None` means the configured default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Page {
    pub offset: u32,
    pub limit: Option<u32>,
}

impl Page {
    pub fn new(offset: u32, limit: u32) -> Self {
        Self {
            offset,
            limit: Some(limit),
        }
    }
}

pub struct FeedService<S> {
    store: S,
    config: CoreConfig,
}

impl<S> FeedService<S>
where
    S: ArticleRepository + UserRepository + FollowRepository + FavoriteRepository,
{
    pub fn new(store: S) -> Self {
        Self::with_config(store, CoreConfig::default())
    }

    pub fn with_config(store: S, config: CoreConfig) -> Self {
        Self {
            store,
            config: config.normalized(),
        }
    }

    /// Lists articles matching every present filter, newest first.
    pub fn list(
        &self,
        filters: &ArticleFilters,
        page: Page,
        viewer: Viewer,
    ) -> ServiceResult<ArticleList> {
        let query = ArticleListQuery {
            tag: filters.tag.as_ref().map(|tag| tag.trim().to_string()),
            author: self.resolve_username(filters.author.as_deref())?,
            favorited_by: self.resolve_username(filters.favorited_by.as_deref())?,
            followed_by: None,
            limit: self.config.page_limit(page.limit),
            offset: page.offset,
        };
        let (records, total) = self.store.list_articles_page(&query)?;
        let articles = records
            .into_iter()
            .map(|record| article_view(&self.store, viewer, record).map_err(ServiceError::from))
            .collect::<ServiceResult<Vec<_>>>()?;
        Ok(finish(query, articles, total))
    }

    /// Articles by profiles the viewer follows, newest first.
    pub fn feed_for(&self, viewer: Viewer, page: Page) -> ServiceResult<ArticleList> {
        let follower = require_profile(viewer)?;
        let query = ArticleListQuery {
            followed_by: Some(follower),
            limit: self.config.page_limit(page.limit),
            offset: page.offset,
            ..ArticleListQuery::default()
        };
        let (records, total) = self.store.list_articles_page(&query)?;
        let articles = records
            .into_iter()
            .map(|record| self.followed_view(follower, record))
            .collect::<ServiceResult<Vec<_>>>()?;
        Ok(finish(query, articles, total))
    }

    /// Every feed author is followed by construction, so only `favorited`
    /// needs a lookup.
    fn followed_view(&self, follower: ProfileId, record: ArticleRecord) -> ServiceResult<ArticleView> {
        let favorited = self.store.is_favorited(follower, record.article.id)?;
        Ok(ArticleView::decorate(record, favorited, true))
    }

    fn resolve_username(&self, username: Option<&str>) -> ServiceResult<Option<ProfileId>> {
        let Some(username) = username else {
            return Ok(None);
        };
        let username = username.trim();
        let profile = self
            .store
            .get_profile_by_username(username)?
            .ok_or_else(|| ServiceError::not_found("profile", username))?;
        Ok(Some(profile.id))
    }
}

fn finish(query: ArticleListQuery, articles: Vec<ArticleView>, articles_count: u64) -> ArticleList {
    debug!(
        "event=article_list module=feed status=ok returned={} total={articles_count} limit={} offset={}",
        articles.len(),
        query.limit,
        query.offset
    );
    ArticleList {
        articles,
        articles_count,
        applied_limit: query.limit,
    }
}
