//! Social graph use-cases: profile lookup and directed follows.
//!
//! # Invariants
//! - Following oneself is rejected with `InvalidOperation`.
//! - Follow and unfollow are idempotent; repeating them is not an error.

use crate::model::user::ProfileId;
use crate::model::view::ProfileView;
use crate::model::viewer::Viewer;
use crate::repo::follow_repo::FollowRepository;
use crate::repo::user_repo::UserRepository;
use crate::service::decorate::profile_view;
use crate::service::error::{ServiceError, ServiceResult};
use crate::service::require_existing_profile;
use log::{debug, info};

pub struct SocialService<S> {
    store: S,
}

impl<S: UserRepository + FollowRepository> SocialService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Adds the edge `follower -> followee`.
    pub fn follow(&self, follower: ProfileId, followee: ProfileId) -> ServiceResult<()> {
        if follower == followee {
            return Err(ServiceError::InvalidOperation(
                "a profile cannot follow itself".to_string(),
            ));
        }
        self.ensure_profile_exists(followee)?;
        let inserted = self.store.insert_follow(follower, followee)?;
        info!(
            "event=follow module=social status=ok follower={follower} followee={followee} inserted={inserted}"
        );
        Ok(())
    }

    /// Removes the edge `follower -> followee` if present.
    pub fn unfollow(&self, follower: ProfileId, followee: ProfileId) -> ServiceResult<()> {
        let removed = self.store.delete_follow(follower, followee)?;
        info!(
            "event=unfollow module=social status=ok follower={follower} followee={followee} removed={removed}"
        );
        Ok(())
    }

    pub fn is_following(&self, follower: ProfileId, followee: ProfileId) -> ServiceResult<bool> {
        Ok(self.store.is_following(follower, followee)?)
    }

    /// Loads a profile by username, decorated for `viewer`.
    pub fn get_profile(&self, username: &str, viewer: Viewer) -> ServiceResult<ProfileView> {
        let profile = self
            .store
            .get_profile_by_username(username)?
            .ok_or_else(|| ServiceError::not_found("profile", username))?;
        debug!("event=profile_get module=social status=ok profile={}", profile.id);
        Ok(profile_view(&self.store, viewer, profile)?)
    }

    pub fn follow_profile(&self, viewer: Viewer, username: &str) -> ServiceResult<ProfileView> {
        let follower = require_existing_profile(&self.store, viewer)?;
        let target = self
            .store
            .get_profile_by_username(username)?
            .ok_or_else(|| ServiceError::not_found("profile", username))?;
        self.follow(follower, target.id)?;
        Ok(ProfileView::decorate(target, true))
    }

    pub fn unfollow_profile(&self, viewer: Viewer, username: &str) -> ServiceResult<ProfileView> {
        let follower = require_existing_profile(&self.store, viewer)?;
        let target = self
            .store
            .get_profile_by_username(username)?
            .ok_or_else(|| ServiceError::not_found("profile", username))?;
        self.unfollow(follower, target.id)?;
        Ok(ProfileView::decorate(target, false))
    }

    fn ensure_profile_exists(&self, id: ProfileId) -> ServiceResult<()> {
        self.store
            .get_profile(id)?
            .map(|_| ())
            .ok_or_else(|| ServiceError::not_found("profile", id))
    }
}
