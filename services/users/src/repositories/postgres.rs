//! PostgreSQL user repository

use async_trait::async_trait;
use common::{
    DatabaseResult,
    database::{begin, commit_or_rollback},
};
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::{debug, info};
use uuid::Uuid;

use super::UserRepository;
use crate::models::{NewUser, User, UserChanges, UserRole};

const USER_COLUMNS: &str = "id, email, nickname, first_name, last_name, bio, \
    profile_picture_url, linkedin_profile_url, github_profile_url, role, hashed_password, \
    is_professional, verification_token, created_at, updated_at";

/// User repository backed by the `users` table
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<User>> {
        info!("Finding user by ID: {}", id);

        let mut tx = begin(&self.pool).await?;
        let result = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .and_then(|row| row.as_ref().map(user_from_row).transpose());

        commit_or_rollback(tx, result).await
    }

    async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<User>> {
        debug!("Finding user by email: {}", email);

        let mut tx = begin(&self.pool).await?;
        let result = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
            .bind(email)
            .fetch_optional(&mut *tx)
            .await
            .and_then(|row| row.as_ref().map(user_from_row).transpose());

        commit_or_rollback(tx, result).await
    }

    async fn insert(&self, new_user: &NewUser) -> DatabaseResult<User> {
        info!("Creating new user");

        let mut tx = begin(&self.pool).await?;
        let result = sqlx::query(&format!(
            r#"
            INSERT INTO users (email, nickname, first_name, last_name, bio,
                               profile_picture_url, linkedin_profile_url, github_profile_url,
                               role, hashed_password, verification_token)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&new_user.email)
        .bind(&new_user.nickname)
        .bind(&new_user.first_name)
        .bind(&new_user.last_name)
        .bind(&new_user.bio)
        .bind(&new_user.profile_picture_url)
        .bind(&new_user.linkedin_profile_url)
        .bind(&new_user.github_profile_url)
        .bind(new_user.role.as_str())
        .bind(&new_user.hashed_password)
        .bind(&new_user.verification_token)
        .fetch_one(&mut *tx)
        .await
        .and_then(|row| user_from_row(&row));

        commit_or_rollback(tx, result).await
    }

    async fn update_columns(
        &self,
        id: Uuid,
        changes: &UserChanges,
    ) -> DatabaseResult<Option<User>> {
        info!("Updating user: {}", id);

        let mut tx = begin(&self.pool).await?;
        let result = sqlx::query(&format!(
            r#"
            UPDATE users
            SET email = COALESCE($2, email),
                nickname = COALESCE($3, nickname),
                first_name = CASE WHEN $4 THEN $5 ELSE first_name END,
                last_name = CASE WHEN $6 THEN $7 ELSE last_name END,
                bio = CASE WHEN $8 THEN $9 ELSE bio END,
                profile_picture_url = CASE WHEN $10 THEN $11 ELSE profile_picture_url END,
                linkedin_profile_url = CASE WHEN $12 THEN $13 ELSE linkedin_profile_url END,
                github_profile_url = CASE WHEN $14 THEN $15 ELSE github_profile_url END,
                role = COALESCE($16, role),
                hashed_password = COALESCE($17, hashed_password),
                is_professional = COALESCE($18, is_professional),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(changes.email.as_deref())
        .bind(changes.nickname.as_deref())
        .bind(changes.first_name.is_some())
        .bind(nullable(&changes.first_name))
        .bind(changes.last_name.is_some())
        .bind(nullable(&changes.last_name))
        .bind(changes.bio.is_some())
        .bind(nullable(&changes.bio))
        .bind(changes.profile_picture_url.is_some())
        .bind(nullable(&changes.profile_picture_url))
        .bind(changes.linkedin_profile_url.is_some())
        .bind(nullable(&changes.linkedin_profile_url))
        .bind(changes.github_profile_url.is_some())
        .bind(nullable(&changes.github_profile_url))
        .bind(changes.role.map(|role| role.as_str()))
        .bind(changes.hashed_password.as_deref())
        .bind(changes.is_professional)
        .fetch_optional(&mut *tx)
        .await
        .and_then(|row| row.as_ref().map(user_from_row).transpose());

        commit_or_rollback(tx, result).await
    }

    async fn list(&self, limit: i64, offset: i64) -> DatabaseResult<(Vec<User>, i64)> {
        let mut tx = begin(&self.pool).await?;
        let result = async {
            let rows = sqlx::query(&format!(
                "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC LIMIT $1 OFFSET $2"
            ))
            .bind(limit)
            .bind(offset)
            .fetch_all(&mut *tx)
            .await?;

            let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
                .fetch_one(&mut *tx)
                .await?;

            let users = rows
                .iter()
                .map(user_from_row)
                .collect::<Result<Vec<_>, _>>()?;

            Ok::<_, sqlx::Error>((users, total))
        }
        .await;

        commit_or_rollback(tx, result).await
    }
}

fn nullable(column: &Option<Option<String>>) -> Option<&str> {
    column.as_ref().and_then(|value| value.as_deref())
}

fn user_from_row(row: &PgRow) -> Result<User, sqlx::Error> {
    let role: String = row.try_get("role")?;
    let role = role
        .parse::<UserRole>()
        .map_err(|e| sqlx::Error::ColumnDecode {
            index: "role".to_string(),
            source: Box::new(e),
        })?;

    Ok(User {
        id: row.try_get("id")?,
        email: row.try_get("email")?,
        nickname: row.try_get("nickname")?,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        bio: row.try_get("bio")?,
        profile_picture_url: row.try_get("profile_picture_url")?,
        linkedin_profile_url: row.try_get("linkedin_profile_url")?,
        github_profile_url: row.try_get("github_profile_url")?,
        role,
        hashed_password: row.try_get("hashed_password")?,
        is_professional: row.try_get("is_professional")?,
        verification_token: row.try_get("verification_token")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
