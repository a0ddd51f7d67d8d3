//! User model and related functionality

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::role::UserRole;

/// User entity
///
/// Credentials are never serialized; responses go through
/// [`crate::schemas::UserResponse`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub nickname: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub profile_picture_url: Option<String>,
    pub linkedin_profile_url: Option<String>,
    pub github_profile_url: Option<String>,
    pub role: UserRole,
    #[serde(skip_serializing)]
    pub hashed_password: String,
    pub is_professional: bool,
    #[serde(skip_serializing)]
    pub verification_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New user insert payload
///
/// Identity, pro status and timestamps are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub nickname: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub profile_picture_url: Option<String>,
    pub linkedin_profile_url: Option<String>,
    pub github_profile_url: Option<String>,
    pub role: UserRole,
    pub hashed_password: String,
    pub verification_token: Option<String>,
}

/// Column-level changes applied to one user row in a single write
///
/// `None` leaves the column untouched. Nullable columns take an inner
/// `Option` so they can be cleared.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserChanges {
    pub email: Option<String>,
    pub nickname: Option<String>,
    pub first_name: Option<Option<String>>,
    pub last_name: Option<Option<String>>,
    pub bio: Option<Option<String>>,
    pub profile_picture_url: Option<Option<String>>,
    pub linkedin_profile_url: Option<Option<String>>,
    pub github_profile_url: Option<Option<String>>,
    pub role: Option<UserRole>,
    pub hashed_password: Option<String>,
    pub is_professional: Option<bool>,
}

impl UserChanges {
    /// True when no column would change
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Copy every set column onto `user`
    pub fn apply_to(&self, user: &mut User) {
        if let Some(email) = &self.email {
            user.email = email.clone();
        }
        if let Some(nickname) = &self.nickname {
            user.nickname = nickname.clone();
        }
        if let Some(first_name) = &self.first_name {
            user.first_name = first_name.clone();
        }
        if let Some(last_name) = &self.last_name {
            user.last_name = last_name.clone();
        }
        if let Some(bio) = &self.bio {
            user.bio = bio.clone();
        }
        if let Some(url) = &self.profile_picture_url {
            user.profile_picture_url = url.clone();
        }
        if let Some(url) = &self.linkedin_profile_url {
            user.linkedin_profile_url = url.clone();
        }
        if let Some(url) = &self.github_profile_url {
            user.github_profile_url = url.clone();
        }
        if let Some(role) = self.role {
            user.role = role;
        }
        if let Some(hashed_password) = &self.hashed_password {
            user.hashed_password = hashed_password.clone();
        }
        if let Some(is_professional) = self.is_professional {
            user.is_professional = is_professional;
        }
    }
}
