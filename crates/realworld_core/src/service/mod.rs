//! Core use-case services.
//!
//! # Responsibility
//! - Validate preconditions (authentication, existence, ownership, no
//!   self-follow) before touching storage.
//! - Orchestrate repository calls into use-case level APIs.
//! - Decorate records with viewer-relative flags on the way out.
//!
//! # Invariants
//! - Services never hold a connection of their own; they receive a
//!   storage handle at construction and use nothing else.
//! - Storage races are translated into `Conflict` or absorbed as no-ops.

pub mod article_service;
pub mod comment_service;
mod decorate;
pub mod error;
pub mod favorite_service;
pub mod feed_service;
pub mod social_service;
pub mod tag_service;
pub mod user_service;

use crate::model::user::ProfileId;
use crate::model::viewer::Viewer;
use crate::repo::user_repo::UserRepository;
use error::{ServiceError, ServiceResult};

/// Returns the viewer's profile or `Unauthorized` for anonymous callers.
pub(crate) fn require_profile(viewer: Viewer) -> ServiceResult<ProfileId> {
    viewer.profile_id().ok_or(ServiceError::Unauthorized)
}

/// Like [`require_profile`], but also rejects a viewer whose profile was
/// deleted after the identity collaborator resolved it.
pub(crate) fn require_existing_profile<S: UserRepository>(
    store: &S,
    viewer: Viewer,
) -> ServiceResult<ProfileId> {
    let profile = require_profile(viewer)?;
    if store.get_profile(profile)?.is_none() {
        return Err(ServiceError::Unauthorized);
    }
    Ok(profile)
}
