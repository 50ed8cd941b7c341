//! Identity model: authentication user and its public profile.
//!
//! # Invariants
//! - Every user owns exactly one profile, created in the same transaction.
//! - `email` and `username` are unique across users.
//! - `password_hash` is opaque; hashing happens outside the core.

use crate::model::validation::{normalize_email, normalize_username, require_text, ValidationError};
use serde::{Deserialize, Serialize};

pub type UserId = i64;
pub type ProfileId = i64;

/// Authentication identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub created_at: i64,
}

/// Public social identity; the unit of authorship, following and favoriting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: ProfileId,
    pub user_id: UserId,
    /// Owning user's username, joined in on read.
    pub username: String,
    pub bio: Option<String>,
    pub image: Option<String>,
}

/// Registration request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub password_hash: String,
}

impl NewUser {
    pub fn new(
        email: impl Into<String>,
        username: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            username: username.into(),
            password_hash: password_hash.into(),
        }
    }

    /// Returns a trimmed copy, or the first invalid field.
    pub fn normalized(&self) -> Result<Self, ValidationError> {
        Ok(Self {
            email: normalize_email(&self.email)?,
            username: normalize_username(&self.username)?,
            password_hash: require_text("password_hash", &self.password_hash)?,
        })
    }
}

/// Partial update of a user and its profile. `None` leaves a field as is.
///
/// An empty `bio` or `image` clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password_hash: Option<String>,
    pub bio: Option<String>,
    pub image: Option<String>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.username.is_none()
            && self.password_hash.is_none()
            && self.bio.is_none()
            && self.image.is_none()
    }

    pub fn normalized(&self) -> Result<Self, ValidationError> {
        Ok(Self {
            email: self.email.as_deref().map(normalize_email).transpose()?,
            username: self.username.as_deref().map(normalize_username).transpose()?,
            password_hash: self
                .password_hash
                .as_deref()
                .map(|value| require_text("password_hash", value))
                .transpose()?,
            bio: self.bio.as_ref().map(|value| value.trim().to_string()),
            image: self.image.as_ref().map(|value| value.trim().to_string()),
        })
    }
}
