//! Input validation utilities

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

/// Reasons a payload is rejected before it reaches the store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid URL format")]
    InvalidUrl,

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Nickname must be at least 3 characters long")]
    NicknameTooShort,

    #[error("Nickname can only contain letters, numbers, underscores, and hyphens")]
    InvalidNickname,

    #[error("must be at least {0} characters long")]
    TooShort(usize),

    #[error("must be at most {0} characters long")]
    TooLong(usize),

    #[error("is required")]
    Required,

    #[error("cannot be null")]
    NotNullable,

    #[error("Password must contain at least one {0}")]
    WeakPassword(&'static str),

    #[error("At least one field must be provided for update")]
    EmptyUpdate,

    /// Wraps another error with the name of the offending field
    #[error("{field}: {source}")]
    Field {
        field: &'static str,
        #[source]
        source: Box<ValidationError>,
    },
}

impl ValidationError {
    /// Attach the offending field name
    pub fn on_field(self, field: &'static str) -> Self {
        ValidationError::Field {
            field,
            source: Box::new(self),
        }
    }

    /// Name of the offending field, when known
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ValidationError::Field { field, .. } => Some(*field),
            _ => None,
        }
    }

    /// The underlying error without field context
    pub fn kind(&self) -> &ValidationError {
        match self {
            ValidationError::Field { source, .. } => source.kind(),
            other => other,
        }
    }
}

/// Types that check their own invariants before use
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Validate an optional URL, passing it through unchanged
///
/// Absent values pass. Present values must use the http or https scheme and
/// a host that does not start with whitespace or one of `/$.?#`.
pub fn validate_url(url: Option<&str>) -> Result<Option<&str>, ValidationError> {
    let Some(url) = url else {
        return Ok(None);
    };

    static URL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = URL_REGEX.get_or_init(|| {
        Regex::new(r"^https?://[^\s/$.?#].[^\s]*$").expect("Failed to compile URL regex")
    });

    if !regex.is_match(url) {
        return Err(ValidationError::InvalidUrl);
    }

    Ok(Some(url))
}

/// Validate email
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Err(ValidationError::Required);
    }

    if email.len() > 254 {
        return Err(ValidationError::TooLong(254));
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err(ValidationError::InvalidEmail);
    }

    Ok(())
}

/// Validate nickname: word characters and hyphens, at least 3 characters
pub fn validate_nickname(nickname: &str) -> Result<(), ValidationError> {
    if nickname.chars().count() < 3 {
        return Err(ValidationError::NicknameTooShort);
    }

    static NICKNAME_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = NICKNAME_REGEX
        .get_or_init(|| Regex::new(r"^[\w-]+$").expect("Failed to compile nickname regex"));

    if !regex.is_match(nickname) {
        return Err(ValidationError::InvalidNickname);
    }

    Ok(())
}

/// Validate password
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::Required);
    }

    let length = password.chars().count();
    if length < 8 {
        return Err(ValidationError::TooShort(8));
    }

    if length > 128 {
        return Err(ValidationError::TooLong(128));
    }

    let mut has_upper = false;
    let mut has_lower = false;
    let mut has_digit = false;
    let mut has_special = false;

    for c in password.chars() {
        if c.is_ascii_uppercase() {
            has_upper = true;
        } else if c.is_ascii_lowercase() {
            has_lower = true;
        } else if c.is_ascii_digit() {
            has_digit = true;
        } else if !c.is_alphanumeric() {
            has_special = true;
        }
    }

    if !has_upper {
        return Err(ValidationError::WeakPassword("uppercase letter"));
    }

    if !has_lower {
        return Err(ValidationError::WeakPassword("lowercase letter"));
    }

    if !has_digit {
        return Err(ValidationError::WeakPassword("digit"));
    }

    if !has_special {
        return Err(ValidationError::WeakPassword("special character"));
    }

    Ok(())
}

/// Validate an upper bound on character count
pub fn validate_max_length(value: &str, max: usize) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        return Err(ValidationError::TooLong(max));
    }
    Ok(())
}
