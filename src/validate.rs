//! Local credential validation.
//!
//! The email shape mirrors the server's accepted character classes; the two
//! sides must stay in lockstep so the client never rejects an address the
//! server would accept (or vice versa).

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

/// Minimum password length in bytes.
pub const PASSWORD_MIN_LEN: usize = 8;

/// Maximum password length in bytes (the conventional bcrypt input bound).
pub const PASSWORD_MAX_LEN: usize = 72;

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

/// Accepted email shape: at least one character before `@`, a domain, and a
/// final label of two or more letters after the last dot.
fn email_re() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$")
            .expect("email regex is valid")
    })
}

/// Failures from local credential checks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid email address format")]
    InvalidEmail,
    #[error("password must be at least {min} characters")]
    PasswordTooShort { min: usize },
    #[error("password must be at most {max} characters")]
    PasswordTooLong { max: usize },
}

/// Check that `email` matches the accepted address shape.
///
/// Surrounding whitespace is ignored; an empty string fails.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let email = email.trim();
    if email.is_empty() || !email_re().is_match(email) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}

/// Check that `password` is between [`PASSWORD_MIN_LEN`] and
/// [`PASSWORD_MAX_LEN`] bytes. Length is byte length (`str::len`).
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.len() < PASSWORD_MIN_LEN {
        return Err(ValidationError::PasswordTooShort {
            min: PASSWORD_MIN_LEN,
        });
    }
    if password.len() > PASSWORD_MAX_LEN {
        return Err(ValidationError::PasswordTooLong {
            max: PASSWORD_MAX_LEN,
        });
    }
    Ok(())
}
