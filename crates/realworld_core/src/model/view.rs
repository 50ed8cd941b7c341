//! Viewer-relative views handed to the presentation boundary.
//!
//! Views wrap persisted records with flags computed at read time. They are
//! built by the decoration step in the service layer and never written back.

use crate::model::article::ArticleRecord;
use crate::model::comment::{CommentId, CommentRecord};
use crate::model::user::{Profile, User};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    pub username: String,
    pub bio: Option<String>,
    pub image: Option<String>,
    /// Whether the viewer follows this profile. Always false for anonymous viewers.
    pub following: bool,
}

impl ProfileView {
    pub fn decorate(profile: Profile, following: bool) -> Self {
        Self {
            username: profile.username,
            bio: profile.bio,
            image: profile.image,
            following,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleView {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub body: String,
    pub tag_list: Vec<String>,
    pub created_at: i64,
    pub updated_at: Option<i64>,
    /// Whether the viewer favorited this article. Always false for anonymous viewers.
    pub favorited: bool,
    pub favorites_count: u64,
    pub author: ProfileView,
}

impl ArticleView {
    pub fn decorate(record: ArticleRecord, favorited: bool, author_following: bool) -> Self {
        let ArticleRecord {
            article,
            author,
            tags,
            favorites_count,
        } = record;
        Self {
            slug: article.slug,
            title: article.title,
            description: article.description,
            body: article.body,
            tag_list: tags,
            created_at: article.created_at,
            updated_at: article.updated_at,
            favorited,
            favorites_count,
            author: ProfileView::decorate(author, author_following),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub id: CommentId,
    pub body: String,
    pub created_at: i64,
    pub updated_at: Option<i64>,
    pub author: ProfileView,
}

impl CommentView {
    pub fn decorate(record: CommentRecord, author_following: bool) -> Self {
        Self {
            id: record.comment.id,
            body: record.comment.body,
            created_at: record.comment.created_at,
            updated_at: record.comment.updated_at,
            author: ProfileView::decorate(record.author, author_following),
        }
    }
}

/// The authenticated user's own account view. Never carries the hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserView {
    pub email: String,
    pub username: String,
    pub bio: Option<String>,
    pub image: Option<String>,
}

impl UserView {
    pub fn from_parts(user: User, profile: Profile) -> Self {
        Self {
            email: user.email,
            username: user.username,
            bio: profile.bio,
            image: profile.image,
        }
    }
}

/// One page of a feed or filtered listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleList {
    /// Sorted by `created_at DESC, id DESC`.
    pub articles: Vec<ArticleView>,
    /// Matches ignoring pagination.
    pub articles_count: u64,
    /// Effective page size after defaults and caps.
    #[serde(skip)]
    pub applied_limit: u32,
}
