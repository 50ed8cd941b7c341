//! Article model and write requests.
//!
//! # Invariants
//! - `slug` is globally unique; a title change produces a new slug instead
//!   of editing the old one.
//! - `author_id` never changes after creation.

use crate::model::tag::normalize_tag_names;
use crate::model::user::{Profile, ProfileId};
use crate::model::validation::{require_text, ValidationError};

pub type ArticleId = i64;

/// Persisted article row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub id: ArticleId,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub body: String,
    pub author_id: ProfileId,
    pub created_at: i64,
    pub updated_at: Option<i64>,
}

/// Article joined with everything list and detail views need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleRecord {
    pub article: Article,
    pub author: Profile,
    /// Tag names in the order they were attached.
    pub tags: Vec<String>,
    pub favorites_count: u64,
}

/// Create request. Slug and author are assigned by the core.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewArticle {
    pub title: String,
    pub description: String,
    pub body: String,
    pub tags: Vec<String>,
}

impl NewArticle {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            body: body.into(),
            tags: Vec::new(),
        }
    }

    pub fn with_tags<S: Into<String>>(mut self, tags: impl IntoIterator<Item = S>) -> Self {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Trims the title, dedupes tags, and rejects a blank title.
    pub fn normalized(&self) -> Result<Self, ValidationError> {
        Ok(Self {
            title: require_text("title", &self.title)?,
            description: self.description.clone(),
            body: self.body.clone(),
            tags: normalize_tag_names(&self.tags)?,
        })
    }
}

/// Partial article update. Slug and author are deliberately absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub body: Option<String>,
}

impl ArticleChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.body.is_none()
    }

    pub fn normalized(&self) -> Result<Self, ValidationError> {
        Ok(Self {
            title: self
                .title
                .as_deref()
                .map(|title| require_text("title", title))
                .transpose()?,
            description: self.description.clone(),
            body: self.body.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{ArticleChanges, NewArticle};
    use crate::model::validation::ValidationError;

    #[test]
    fn new_article_requires_title() {
        let err = NewArticle::new("   ", "d", "b").normalized().unwrap_err();
        assert_eq!(err, ValidationError::BlankField("title"));
    }

    #[test]
    fn new_article_dedupes_tags() {
        let article = NewArticle::new("How to train your dragon", "d", "b")
            .with_tags(["dragons", "dragons", "training"])
            .normalized()
            .unwrap();
        assert_eq!(article.tags, vec!["dragons", "training"]);
    }

    #[test]
    fn changes_reject_blank_title_but_allow_absent_one() {
        let blank = ArticleChanges {
            title: Some(" ".to_string()),
            ..ArticleChanges::default()
        };
        assert!(blank.normalized().is_err());
        let body_only = ArticleChanges {
            body: Some("new body".to_string()),
            ..ArticleChanges::default()
        };
        assert!(body_only.normalized().is_ok());
        assert!(ArticleChanges::default().is_empty());
    }
}
