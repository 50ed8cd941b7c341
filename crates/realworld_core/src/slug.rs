//! Article slug generation.
//!
//! # Responsibility
//! - Turn a title into a lowercase, hyphenated, ASCII-only slug.
//! - Embed a random token so identical titles get distinct slugs.
//!
//! # Invariants
//! - Output is never empty and contains only `[a-z0-9-]`.
//! - The generator never reads storage. The `articles.slug` unique index is
//!   the authority; callers regenerate on a reported collision.

use crate::model::validation::{require_text, ValidationError};
use uuid::Uuid;

/// Hex characters of randomness appended to every slug.
const TOKEN_LEN: usize = 12;

/// Source of candidate slugs for article titles.
pub trait SlugGenerator {
    /// Produces one candidate slug. Fails only for a blank title.
    fn generate(&self, title: &str) -> Result<String, ValidationError>;
}

/// Default generator: normalized title plus a random hex token.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomSuffixSlugGenerator;

impl SlugGenerator for RandomSuffixSlugGenerator {
    fn generate(&self, title: &str) -> Result<String, ValidationError> {
        slugify_with_token(title, &random_token())
    }
}

/// Normalizes `title` and `token` into one slug.
///
/// Non-ASCII letters are transliterated, every other run of non-alphanumeric
/// characters collapses into a single hyphen.
pub fn slugify_with_token(title: &str, token: &str) -> Result<String, ValidationError> {
    let title = require_text("title", title)?;
    Ok(::slug::slugify(format!("{title} {token}")))
}

fn random_token() -> String {
    let mut token = Uuid::new_v4().simple().to_string();
    token.truncate(TOKEN_LEN);
    token
}
