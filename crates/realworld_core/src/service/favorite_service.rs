//! Favorite edges between profiles and articles.
//!
//! Id-level operations; slug-based use-cases live in the article service.

use crate::model::article::ArticleId;
use crate::model::user::ProfileId;
use crate::repo::article_repo::ArticleRepository;
use crate::repo::favorite_repo::FavoriteRepository;
use crate::service::error::{ServiceError, ServiceResult};
use log::info;

pub struct FavoriteService<S> {
    store: S,
}

impl<S: ArticleRepository + FavoriteRepository> FavoriteService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Marks `article` as a favorite of `profile`. Repeating it is a no-op.
    pub fn favorite(&self, profile: ProfileId, article: ArticleId) -> ServiceResult<()> {
        if !self.store.article_exists(article)? {
            return Err(ServiceError::not_found("article", article));
        }
        let inserted = self.store.insert_favorite(profile, article)?;
        info!(
            "event=favorite module=favorites status=ok profile={profile} article={article} inserted={inserted}"
        );
        Ok(())
    }

    /// Removes the favorite edge if present.
    pub fn unfavorite(&self, profile: ProfileId, article: ArticleId) -> ServiceResult<()> {
        let removed = self.store.delete_favorite(profile, article)?;
        info!(
            "event=unfavorite module=favorites status=ok profile={profile} article={article} removed={removed}"
        );
        Ok(())
    }

    pub fn is_favorited(&self, profile: ProfileId, article: ArticleId) -> ServiceResult<bool> {
        Ok(self.store.is_favorited(profile, article)?)
    }

    pub fn favorite_count(&self, article: ArticleId) -> ServiceResult<u64> {
        Ok(self.store.favorite_count(article)?)
    }
}
