//! Repositories for user persistence

use async_trait::async_trait;
use common::DatabaseResult;
use uuid::Uuid;

use crate::models::{NewUser, User, UserChanges};

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryUserRepository;
pub use postgres::PgUserRepository;

/// Persistence contract for user rows
///
/// Every call is its own unit of work: it either commits in full or leaves
/// the store untouched.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by primary key
    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<User>>;

    /// Find a user by exact email match
    async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<User>>;

    /// Insert a user and return the stored row
    async fn insert(&self, new_user: &NewUser) -> DatabaseResult<User>;

    /// Write only the columns set in `changes` and return the refreshed row
    ///
    /// The write is a single atomic step, so concurrent calls touching
    /// different columns never overwrite each other. `None` means no row
    /// has this id.
    async fn update_columns(
        &self,
        id: Uuid,
        changes: &UserChanges,
    ) -> DatabaseResult<Option<User>>;

    /// One page of users, newest first, with the total row count
    async fn list(&self, limit: i64, offset: i64) -> DatabaseResult<(Vec<User>, i64)>;
}
