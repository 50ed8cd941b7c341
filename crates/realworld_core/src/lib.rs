//! Content and social-graph core for a publishing backend.
//! This crate is the single source of truth for publishing invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod slug;

pub use config::CoreConfig;
pub use crate::slug::{slugify_with_token, RandomSuffixSlugGenerator, SlugGenerator};
pub use db::{open_db, open_db_in_memory, open_db_with_config, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::article::{Article, ArticleChanges, ArticleId, ArticleRecord, NewArticle};
pub use model::comment::{Comment, CommentId, CommentRecord};
pub use model::tag::{normalize_tag_names, Tag, TagId};
pub use model::user::{NewUser, Profile, ProfileId, User, UserChanges, UserId};
pub use model::validation::ValidationError;
pub use model::view::{ArticleList, ArticleView, CommentView, ProfileView, UserView};
pub use model::viewer::Viewer;
pub use repo::article_repo::{ArticleListQuery, ArticleRepository};
pub use repo::comment_repo::CommentRepository;
pub use repo::favorite_repo::FavoriteRepository;
pub use repo::follow_repo::FollowRepository;
pub use repo::tag_repo::TagRepository;
pub use repo::user_repo::UserRepository;
pub use repo::{RepoError, RepoResult, SqliteStore};
pub use service::article_service::ArticleService;
pub use service::comment_service::CommentService;
pub use service::error::{ErrorKind, ServiceError, ServiceResult};
pub use service::favorite_service::FavoriteService;
pub use service::feed_service::{ArticleFilters, FeedService, Page};
pub use service::social_service::SocialService;
pub use service::tag_service::TagService;
pub use service::user_service::{IdentityProvider, UserService};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
