//! User service models

pub mod role;
pub mod user;

// Re-export for convenience
pub use role::{ParseRoleError, UserRole};
pub use user::{NewUser, User, UserChanges};
