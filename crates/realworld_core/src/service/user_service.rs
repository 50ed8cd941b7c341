//! Identity use-cases: registration, account updates, viewer resolution.
//!
//! # Invariants
//! - Registration creates the user and its profile atomically.
//! - Duplicate email/username is detected by the unique indexes and
//!   reported as `Conflict`; there is no separate existence pre-check.
//! - The core never sees raw passwords or tokens; it stores an opaque hash
//!   and asks an [`IdentityProvider`] to map credentials to a user.

use crate::model::user::{NewUser, Profile, User, UserChanges, UserId};
use crate::model::view::UserView;
use crate::model::viewer::Viewer;
use crate::repo::user_repo::UserRepository;
use crate::service::error::{ServiceError, ServiceResult};
use crate::service::require_profile;
use log::{info, warn};

/// Identity collaborator: maps request credentials to a user.
///
/// Token verification lives outside the core; implementations return
/// `None` for credentials they reject.
pub trait IdentityProvider {
    fn resolve_user(&self, credentials: &str) -> Option<UserId>;
}

pub struct UserService<S> {
    store: S,
}

impl<S: UserRepository> UserService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Creates a user and its profile.
    pub fn register(&self, new_user: &NewUser) -> ServiceResult<UserView> {
        let new_user = new_user.normalized()?;
        let user = self.store.create_user(&new_user).map_err(|err| {
            warn!("event=user_register module=user status=error error={err}");
            err
        })?;
        let profile = self.profile_of(&user)?;
        info!(
            "event=user_register module=user status=ok user={} profile={}",
            user.id, profile.id
        );
        Ok(UserView::from_parts(user, profile))
    }

    /// Returns the authenticated viewer's own account.
    pub fn current_user(&self, viewer: Viewer) -> ServiceResult<UserView> {
        let (user, profile) = self.load_viewer(viewer)?;
        Ok(UserView::from_parts(user, profile))
    }

    /// Applies `changes` to the viewer's account and profile.
    pub fn update_user(&self, viewer: Viewer, changes: &UserChanges) -> ServiceResult<UserView> {
        let (user, _) = self.load_viewer(viewer)?;
        let changes = changes.normalized()?;
        if !changes.is_empty() {
            self.store.update_user(user.id, &changes)?;
            info!("event=user_update module=user status=ok user={}", user.id);
        }
        self.current_user(viewer)
    }

    /// Deletes a user; the profile and its content cascade.
    pub fn delete_user(&self, id: UserId) -> ServiceResult<()> {
        self.store.delete_user(id)?;
        info!("event=user_delete module=user status=ok user={id}");
        Ok(())
    }

    /// Looks up an account by email, e.g. for credential checks by the host.
    pub fn find_by_email(&self, email: &str) -> ServiceResult<User> {
        self.store
            .get_user_by_email(email.trim())?
            .ok_or_else(|| ServiceError::not_found("user", email.trim()))
    }

    /// Turns optional request credentials into a [`Viewer`].
    ///
    /// No credentials means an anonymous viewer. Credentials that the
    /// provider rejects, or that point to a deleted user, are `Unauthorized`.
    pub fn resolve_viewer<P: IdentityProvider + ?Sized>(
        &self,
        provider: &P,
        credentials: Option<&str>,
    ) -> ServiceResult<Viewer> {
        let Some(credentials) = credentials else {
            return Ok(Viewer::Anonymous);
        };
        let user_id = provider
            .resolve_user(credentials)
            .ok_or(ServiceError::Unauthorized)?;
        let profile = self
            .store
            .get_profile_by_user(user_id)?
            .ok_or(ServiceError::Unauthorized)?;
        Ok(Viewer::Authenticated(profile.id))
    }

    fn load_viewer(&self, viewer: Viewer) -> ServiceResult<(User, Profile)> {
        let profile_id = require_profile(viewer)?;
        let profile = self
            .store
            .get_profile(profile_id)?
            .ok_or(ServiceError::Unauthorized)?;
        let user = self
            .store
            .get_user(profile.user_id)?
            .ok_or(ServiceError::Unauthorized)?;
        Ok((user, profile))
    }

    fn profile_of(&self, user: &User) -> ServiceResult<Profile> {
        self.store
            .get_profile_by_user(user.id)?
            .ok_or_else(|| ServiceError::not_found("profile", &user.username))
    }
}
