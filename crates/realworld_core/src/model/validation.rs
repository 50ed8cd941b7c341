//! Input validation shared by write requests.

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+$").expect("valid email regex"));
// Usernames appear in profile paths, so no whitespace or path separators.
static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s/?#]+$").expect("valid username regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required text field is empty after trim.
    BlankField(&'static str),
    InvalidEmail(String),
    InvalidUsername(String),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankField(field) => write!(f, "{field} must not be blank"),
            Self::InvalidEmail(value) => write!(f, "invalid email: `{value}`"),
            Self::InvalidUsername(value) => write!(f, "invalid username: `{value}`"),
        }
    }
}

impl Error for ValidationError {}

/// Trims `value` and rejects it when nothing is left.
pub fn require_text(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::BlankField(field));
    }
    Ok(trimmed.to_string())
}

pub fn normalize_email(value: &str) -> Result<String, ValidationError> {
    let email = require_text("email", value)?;
    if !EMAIL_RE.is_match(&email) {
        return Err(ValidationError::InvalidEmail(email));
    }
    Ok(email)
}

pub fn normalize_username(value: &str) -> Result<String, ValidationError> {
    let username = require_text("username", value)?;
    if !USERNAME_RE.is_match(&username) {
        return Err(ValidationError::InvalidUsername(username));
    }
    Ok(username)
}

#[cfg(test)]
mod tests {
    use super::{normalize_email, normalize_username, require_text, ValidationError};

    #[test]
    fn require_text_trims_and_rejects_blank() {
        assert_eq!(require_text("title", "  hi ").unwrap(), "hi");
        assert_eq!(
            require_text("title", " \n ").unwrap_err(),
            ValidationError::BlankField("title")
        );
    }

    #[test]
    fn email_and_username_shapes() {
        assert_eq!(normalize_email(" a@b.io ").unwrap(), "a@b.io");
        assert!(matches!(
            normalize_email("not-an-email"),
            Err(ValidationError::InvalidEmail(_))
        ));
        assert_eq!(normalize_username("jake").unwrap(), "jake");
        assert!(matches!(
            normalize_username("jake doe"),
            Err(ValidationError::InvalidUsername(_))
        ));
        assert!(matches!(
            normalize_username("a/b"),
            Err(ValidationError::InvalidUsername(_))
        ));
    }
}
