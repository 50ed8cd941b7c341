//! Tag resolver use-cases.

use crate::model::tag::{normalize_tag_names, Tag};
use crate::repo::tag_repo::TagRepository;
use crate::service::error::ServiceResult;
use log::debug;

pub struct TagService<S> {
    store: S,
}

impl<S: TagRepository> TagService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns one tag per distinct name, creating only the missing ones.
    ///
    /// Names are trimmed and deduplicated first; a blank name is a
    /// validation error.
    pub fn resolve<N: AsRef<str>>(&self, names: &[N]) -> ServiceResult<Vec<Tag>> {
        let names = normalize_tag_names(names)?;
        let tags = self.store.resolve_tags(&names)?;
        debug!("event=tags_resolve module=tags status=ok count={}", tags.len());
        Ok(tags)
    }

    /// All known tag names, sorted.
    pub fn list_tags(&self) -> ServiceResult<Vec<String>> {
        Ok(self.store.list_tags()?)
    }
}
