//! Viewer-relative decoration of persisted records.
//!
//! Each flag is one indexed membership lookup; nothing here writes.

use crate::model::article::ArticleRecord;
use crate::model::comment::CommentRecord;
use crate::model::user::Profile;
use crate::model::view::{ArticleView, CommentView, ProfileView};
use crate::model::viewer::Viewer;
use crate::repo::favorite_repo::FavoriteRepository;
use crate::repo::follow_repo::FollowRepository;
use crate::repo::RepoResult;

fn follows<S: FollowRepository>(store: &S, viewer: Viewer, profile: &Profile) -> RepoResult<bool> {
    match viewer.profile_id() {
        Some(viewer_id) if viewer_id != profile.id => store.is_following(viewer_id, profile.id),
        _ => Ok(false),
    }
}

pub(crate) fn profile_view<S: FollowRepository>(
    store: &S,
    viewer: Viewer,
    profile: Profile,
) -> RepoResult<ProfileView> {
    let following = follows(store, viewer, &profile)?;
    Ok(ProfileView::decorate(profile, following))
}

pub(crate) fn article_view<S: FollowRepository + FavoriteRepository>(
    store: &S,
    viewer: Viewer,
    record: ArticleRecord,
) -> RepoResult<ArticleView> {
    let favorited = match viewer.profile_id() {
        Some(viewer_id) => store.is_favorited(viewer_id, record.article.id)?,
        None => false,
    };
    let following = follows(store, viewer, &record.author)?;
    Ok(ArticleView::decorate(record, favorited, following))
}

pub(crate) fn comment_view<S: FollowRepository>(
    store: &S,
    viewer: Viewer,
    record: CommentRecord,
) -> RepoResult<CommentView> {
    let following = follows(store, viewer, &record.author)?;
    Ok(CommentView::decorate(record, following))
}
