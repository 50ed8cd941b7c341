//! Domain model for the content and social-graph core.
//!
//! # Responsibility
//! - Define persisted entities (users, profiles, articles, tags, comments).
//! - Define write requests with their input validation.
//! - Define viewer-relative view types produced by decoration.
//!
//! # Invariants
//! - Viewer-relative flags (`following`, `favorited`) exist only on view
//!   types and are never persisted.
//! - Timestamps are Unix epoch milliseconds; `updated_at` stays `None` until
//!   the first mutation.

pub mod article;
pub mod comment;
pub mod tag;
pub mod user;
pub mod validation;
pub mod view;
pub mod viewer;
