//! In-memory user repository for tests and local development

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use common::{DatabaseError, DatabaseResult};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::UserRepository;
use crate::models::{NewUser, User, UserChanges};

/// Process-local store with the same uniqueness rules as the `users` table
#[derive(Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn email_taken(users: &HashMap<Uuid, User>, email: &str, except: Option<Uuid>) -> bool {
    users
        .values()
        .any(|u| u.email == email && Some(u.id) != except)
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn insert(&self, new_user: &NewUser) -> DatabaseResult<User> {
        let mut users = self.users.write().await;
        if email_taken(&users, &new_user.email, None) {
            return Err(DatabaseError::Conflict("email already exists".to_string()));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: new_user.email.clone(),
            nickname: new_user.nickname.clone(),
            first_name: new_user.first_name.clone(),
            last_name: new_user.last_name.clone(),
            bio: new_user.bio.clone(),
            profile_picture_url: new_user.profile_picture_url.clone(),
            linkedin_profile_url: new_user.linkedin_profile_url.clone(),
            github_profile_url: new_user.github_profile_url.clone(),
            role: new_user.role,
            hashed_password: new_user.hashed_password.clone(),
            is_professional: false,
            verification_token: new_user.verification_token.clone(),
            created_at: now,
            updated_at: now,
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_columns(
        &self,
        id: Uuid,
        changes: &UserChanges,
    ) -> DatabaseResult<Option<User>> {
        let mut users = self.users.write().await;
        if !users.contains_key(&id) {
            return Ok(None);
        }
        if let Some(email) = &changes.email {
            if email_taken(&users, email, Some(id)) {
                return Err(DatabaseError::Conflict("email already exists".to_string()));
            }
        }

        let Some(stored) = users.get_mut(&id) else {
            return Ok(None);
        };
        changes.apply_to(stored);
        stored.updated_at = Utc::now();
        Ok(Some(stored.clone()))
    }

    async fn list(&self, limit: i64, offset: i64) -> DatabaseResult<(Vec<User>, i64)> {
        let users = self.users.read().await;
        let mut all: Vec<User> = users.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = all.len() as i64;
        let page = all
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect();

        Ok((page, total))
    }
}
