//! Comment model.

use crate::model::article::ArticleId;
use crate::model::user::{Profile, ProfileId};

pub type CommentId = i64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: CommentId,
    pub body: String,
    pub author_id: ProfileId,
    pub article_id: ArticleId,
    pub created_at: i64,
    pub updated_at: Option<i64>,
}

/// Comment joined with its author profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentRecord {
    pub comment: Comment,
    pub author: Profile,
}
