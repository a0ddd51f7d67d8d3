//! Request and response payloads for user operations
//!
//! Inbound payloads implement [`Validate`] and are checked before any store
//! access. Outbound payloads are built from a [`User`] and never carry
//! credentials.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::models::{User, UserRole};
use crate::validation::{
    Validate, ValidationError, validate_email, validate_max_length, validate_nickname,
    validate_password, validate_url,
};

const NAME_MAX_LENGTH: usize = 50;
const BIO_MAX_LENGTH: usize = 255;

/// Fields shared by create payloads and responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserBase {
    /// e.g. `john.doe@example.com`
    pub email: String,
    /// e.g. `john_doe123`
    pub nickname: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    /// e.g. `https://example.com/profiles/john.jpg`
    pub profile_picture_url: Option<String>,
    /// e.g. `https://linkedin.com/in/johndoe`
    pub linkedin_profile_url: Option<String>,
    /// e.g. `https://github.com/johndoe`
    pub github_profile_url: Option<String>,
    pub role: UserRole,
}

impl Validate for UserBase {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_profile_urls(
            self.profile_picture_url.as_deref(),
            self.linkedin_profile_url.as_deref(),
            self.github_profile_url.as_deref(),
        )?;
        validate_email(&self.email).map_err(|e| e.on_field("email"))?;
        if let Some(nickname) = &self.nickname {
            validate_nickname(nickname).map_err(|e| e.on_field("nickname"))?;
        }
        Ok(())
    }
}

/// Payload for creating a user
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UserCreate {
    #[serde(flatten)]
    pub base: UserBase,
    /// Plaintext, hashed before storage. e.g. `Secure*1234`
    pub password: String,
}

impl Validate for UserCreate {
    fn validate(&self) -> Result<(), ValidationError> {
        self.base.validate()?;
        validate_password(&self.password).map_err(|e| e.on_field("password"))
    }
}

/// Partial update of a user
///
/// Each field distinguishes three states: absent (`None`), explicit null
/// (`Some(None)`, clears a nullable column) and a new value
/// (`Some(Some(v))`). Names and bio are trimmed on input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserUpdate {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub nickname: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "present_trimmed",
        skip_serializing_if = "Option::is_none"
    )]
    pub first_name: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "present_trimmed",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_name: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "present_trimmed",
        skip_serializing_if = "Option::is_none"
    )]
    pub bio: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub profile_picture_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub linkedin_profile_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub github_profile_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub role: Option<Option<UserRole>>,
    #[serde(default, deserialize_with = "present", skip_serializing)]
    pub password: Option<Option<String>>,
}

impl UserUpdate {
    /// True when no field was supplied at all
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.nickname.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.bio.is_none()
            && self.profile_picture_url.is_none()
            && self.linkedin_profile_url.is_none()
            && self.github_profile_url.is_none()
            && self.role.is_none()
            && self.password.is_none()
    }
}

impl Validate for UserUpdate {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.is_empty() {
            return Err(ValidationError::EmptyUpdate);
        }

        validate_profile_urls(
            self.profile_picture_url.as_ref().and_then(|v| v.as_deref()),
            self.linkedin_profile_url.as_ref().and_then(|v| v.as_deref()),
            self.github_profile_url.as_ref().and_then(|v| v.as_deref()),
        )?;

        if let Some(email) = &self.email {
            let email = email
                .as_deref()
                .ok_or_else(|| ValidationError::NotNullable.on_field("email"))?;
            validate_email(email).map_err(|e| e.on_field("email"))?;
        }

        if let Some(nickname) = &self.nickname {
            let nickname = nickname
                .as_deref()
                .ok_or_else(|| ValidationError::NotNullable.on_field("nickname"))?;
            validate_nickname(nickname).map_err(|e| e.on_field("nickname"))?;
        }

        for (field, value, max) in [
            ("first_name", &self.first_name, NAME_MAX_LENGTH),
            ("last_name", &self.last_name, NAME_MAX_LENGTH),
            ("bio", &self.bio, BIO_MAX_LENGTH),
        ] {
            if let Some(Some(value)) = value {
                validate_max_length(value, max).map_err(|e| e.on_field(field))?;
            }
        }

        if let Some(None) = self.role {
            return Err(ValidationError::NotNullable.on_field("role"));
        }

        if let Some(password) = &self.password {
            let password = password
                .as_deref()
                .ok_or_else(|| ValidationError::NotNullable.on_field("password"))?;
            validate_password(password).map_err(|e| e.on_field("password"))?;
        }

        Ok(())
    }
}

/// User representation returned to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    #[serde(flatten)]
    pub base: UserBase,
    pub is_professional: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            base: UserBase {
                email: user.email.clone(),
                nickname: Some(user.nickname.clone()),
                first_name: user.first_name.clone(),
                last_name: user.last_name.clone(),
                bio: user.bio.clone(),
                profile_picture_url: user.profile_picture_url.clone(),
                linkedin_profile_url: user.linkedin_profile_url.clone(),
                github_profile_url: user.github_profile_url.clone(),
                role: user.role,
            },
            is_professional: user.is_professional,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}

/// Paginated list of users
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserListResponse {
    pub items: Vec<UserResponse>,
    pub total: i64,
    pub page: u32,
    pub size: u32,
}

/// Error body returned by the HTTP layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// e.g. `Not Found`
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

fn validate_profile_urls(
    profile_picture_url: Option<&str>,
    linkedin_profile_url: Option<&str>,
    github_profile_url: Option<&str>,
) -> Result<(), ValidationError> {
    validate_url(profile_picture_url).map_err(|e| e.on_field("profile_picture_url"))?;
    validate_url(linkedin_profile_url).map_err(|e| e.on_field("linkedin_profile_url"))?;
    validate_url(github_profile_url).map_err(|e| e.on_field("github_profile_url"))?;
    Ok(())
}

/// Marks a key as present, keeping an explicit null as `Some(None)`
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn present_trimmed<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(Some(value.map(|v| v.trim().to_string())))
}
