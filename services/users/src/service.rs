//! User service: mediates between validated payloads and the user store

use std::sync::Arc;

use tracing::{Span, error, info, info_span, instrument, warn};
use uuid::Uuid;

use crate::config::UserServiceConfig;
use crate::error::{UserServiceError, UserServiceResult};
use crate::models::{NewUser, User, UserChanges, UserRole};
use crate::nickname::generate_nickname;
use crate::repositories::UserRepository;
use crate::schemas::{UserCreate, UserListResponse, UserResponse, UserUpdate};
use crate::security::{generate_verification_token, hash_password};
use crate::validation::Validate;

/// Stateless façade over a [`UserRepository`]
///
/// All diagnostics are emitted inside the span handed to
/// [`UserService::with_span`], so callers decide where the service logs.
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
    config: UserServiceConfig,
    span: Span,
}

impl UserService {
    /// Create a service logging under a default `user_service` span
    pub fn new(users: Arc<dyn UserRepository>, config: UserServiceConfig) -> Self {
        Self::with_span(users, config, info_span!("user_service"))
    }

    /// Create a service logging under the given span
    pub fn with_span(
        users: Arc<dyn UserRepository>,
        config: UserServiceConfig,
        span: Span,
    ) -> Self {
        Self {
            users,
            config,
            span,
        }
    }

    /// Look a user up by primary key
    #[instrument(parent = &self.span, skip(self))]
    pub async fn get_by_id(&self, user_id: Uuid) -> UserServiceResult<User> {
        self.fetch_user(user_id).await
    }

    /// Look a user up by email
    #[instrument(parent = &self.span, skip(self, email))]
    pub async fn find_by_email(&self, email: &str) -> UserServiceResult<User> {
        match self.users.find_by_email(email).await {
            Ok(Some(user)) => Ok(user),
            Ok(None) => {
                warn!("User with the given email not found.");
                Err(UserServiceError::NotFound(email.to_string()))
            }
            Err(e) => {
                error!("Database error: {}", e);
                Err(e.into())
            }
        }
    }

    /// Register a new account
    ///
    /// The password is hashed, a verification token and nickname are
    /// generated, and the role is always [`UserRole::User`] whatever the
    /// payload asked for.
    #[instrument(parent = &self.span, skip(self, user_data))]
    pub async fn create_user(&self, user_data: UserCreate) -> UserServiceResult<User> {
        user_data.validate()?;

        let hashed_password = hash_password(&user_data.password).map_err(|e| {
            error!("Error creating user: {}", e);
            UserServiceError::Security(e)
        })?;

        let base = user_data.base;
        let new_user = NewUser {
            email: base.email,
            nickname: generate_nickname(),
            first_name: base.first_name,
            last_name: base.last_name,
            bio: base.bio,
            profile_picture_url: base.profile_picture_url,
            linkedin_profile_url: base.linkedin_profile_url,
            github_profile_url: base.github_profile_url,
            role: UserRole::User,
            hashed_password,
            verification_token: Some(generate_verification_token()),
        };

        let user = self.users.insert(&new_user).await.map_err(|e| {
            error!("Error creating user: {}", e);
            UserServiceError::from(e)
        })?;

        info!(user_id = %user.id, "User created");
        Ok(user)
    }

    /// Replace the profile, LinkedIn and GitHub links supplied in `user_update`
    ///
    /// Absent links keep their stored value; an explicit null clears them.
    /// Every other field of the update is ignored, and an update carrying no
    /// link returns the stored user without writing.
    #[instrument(parent = &self.span, skip(self, user_update))]
    pub async fn update_user_profile(
        &self,
        user_id: Uuid,
        user_update: &UserUpdate,
    ) -> UserServiceResult<User> {
        user_update.validate()?;

        let changes = profile_links(user_update);
        if changes.is_empty() {
            return self.fetch_user(user_id).await;
        }

        self.write(user_id, &changes, "Error updating user profile").await
    }

    /// Apply every field supplied in `user_update`
    #[instrument(parent = &self.span, skip(self, user_update))]
    pub async fn update_user(
        &self,
        user_id: Uuid,
        user_update: &UserUpdate,
    ) -> UserServiceResult<User> {
        user_update.validate()?;

        let hashed_password = match &user_update.password {
            Some(Some(password)) => Some(hash_password(password).map_err(|e| {
                error!("Error updating user: {}", e);
                UserServiceError::Security(e)
            })?),
            _ => None,
        };

        let changes = UserChanges {
            email: user_update.email.clone().flatten(),
            nickname: user_update.nickname.clone().flatten(),
            first_name: user_update.first_name.clone(),
            last_name: user_update.last_name.clone(),
            bio: user_update.bio.clone(),
            role: user_update.role.flatten(),
            hashed_password,
            ..profile_links(user_update)
        };

        if changes.is_empty() {
            return self.fetch_user(user_id).await;
        }

        self.write(user_id, &changes, "Error updating user").await
    }

    /// Set the pro-status flag; repeated calls leave it set
    #[instrument(parent = &self.span, skip(self))]
    pub async fn upgrade_user_to_pro(&self, user_id: Uuid) -> UserServiceResult<User> {
        let changes = UserChanges {
            is_professional: Some(true),
            ..Default::default()
        };

        let user = self
            .write(user_id, &changes, "Error upgrading user to PRO")
            .await?;
        info!("User {} upgraded to PRO status.", user_id);
        Ok(user)
    }

    /// One page of users, newest first
    ///
    /// `page` is 1-based. Missing or out-of-range values fall back to the
    /// configured defaults and limits.
    #[instrument(parent = &self.span, skip(self))]
    pub async fn list_users(
        &self,
        page: Option<u32>,
        size: Option<u32>,
    ) -> UserServiceResult<UserListResponse> {
        let page = page.unwrap_or(1).max(1);
        let size = size
            .unwrap_or(self.config.default_page_size)
            .min(self.config.max_page_size)
            .max(1);
        let offset = (i64::from(page) - 1) * i64::from(size);

        let (users, total) = self
            .users
            .list(i64::from(size), offset)
            .await
            .map_err(|e| {
                error!("Error listing users: {}", e);
                UserServiceError::from(e)
            })?;

        Ok(UserListResponse {
            items: users.iter().map(UserResponse::from).collect(),
            total,
            page,
            size,
        })
    }

    async fn fetch_user(&self, user_id: Uuid) -> UserServiceResult<User> {
        match self.users.find_by_id(user_id).await {
            Ok(Some(user)) => Ok(user),
            Ok(None) => {
                warn!("User with ID {} not found.", user_id);
                Err(UserServiceError::NotFound(user_id.to_string()))
            }
            Err(e) => {
                error!("Database error: {}", e);
                Err(e.into())
            }
        }
    }

    /// Write only the columns set in `changes`, mapping a vanished row to
    /// [`UserServiceError::NotFound`]
    async fn write(
        &self,
        user_id: Uuid,
        changes: &UserChanges,
        context: &str,
    ) -> UserServiceResult<User> {
        match self.users.update_columns(user_id, changes).await {
            Ok(Some(user)) => Ok(user),
            Ok(None) => {
                warn!("User with ID {} not found.", user_id);
                Err(UserServiceError::NotFound(user_id.to_string()))
            }
            Err(e) => {
                error!("{}: {}", context, e);
                Err(e.into())
            }
        }
    }
}

fn profile_links(user_update: &UserUpdate) -> UserChanges {
    UserChanges {
        profile_picture_url: user_update.profile_picture_url.clone(),
        linkedin_profile_url: user_update.linkedin_profile_url.clone(),
        github_profile_url: user_update.github_profile_url.clone(),
        ..Default::default()
    }
}
