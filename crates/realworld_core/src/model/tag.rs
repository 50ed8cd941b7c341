//! Tag labels shared across articles.

use crate::model::validation::ValidationError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub type TagId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
}

/// Trims and deduplicates tag names, keeping first-seen order.
///
/// Names are case-sensitive; `Rust` and `rust` are two tags.
pub fn normalize_tag_names<S: AsRef<str>>(names: &[S]) -> Result<Vec<String>, ValidationError> {
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(names.len());
    for name in names {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ValidationError::BlankField("tag"));
        }
        if seen.insert(trimmed.to_string()) {
            out.push(trimmed.to_string());
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::normalize_tag_names;

    #[test]
    fn dedupes_in_first_seen_order() {
        let names = normalize_tag_names(&["dragons", " training", "dragons", "Dragons"]).unwrap();
        assert_eq!(names, vec!["dragons", "training", "Dragons"]);
    }

    #[test]
    fn rejects_blank_names() {
        assert!(normalize_tag_names(&["ok", "  "]).is_err());
    }
}
