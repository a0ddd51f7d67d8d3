//! User management for the application
//!
//! Validation schemas for inbound and outbound user payloads, and a
//! [`UserService`](service::UserService) that creates, updates and fetches
//! user accounts through a [`UserRepository`](repositories::UserRepository).
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use common::database::{DatabaseConfig, init_pool};
//! use users::{config::UserServiceConfig, repositories::PgUserRepository, service::UserService};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = init_pool(&DatabaseConfig::from_env()?).await?;
//!     let service = UserService::new(
//!         Arc::new(PgUserRepository::new(pool)),
//!         UserServiceConfig::from_env(),
//!     );
//!     let page = service.list_users(None, None).await?;
//!     println!("{} users", page.total);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod nickname;
pub mod repositories;
pub mod schemas;
pub mod security;
pub mod service;
pub mod validation;

pub use error::{UserServiceError, UserServiceResult};
pub use service::UserService;
