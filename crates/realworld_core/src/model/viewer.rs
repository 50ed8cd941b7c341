//! Caller identity as seen by the core.

use crate::model::user::ProfileId;

/// Who is asking. Resolved from credentials by the identity collaborator.
///
/// An `Authenticated` profile may have been deleted since it was resolved;
/// services re-check existence before writing on its behalf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Viewer {
    #[default]
    Anonymous,
    Authenticated(ProfileId),
}

impl Viewer {
    pub fn profile_id(self) -> Option<ProfileId> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated(profile_id) => Some(profile_id),
        }
    }
}
