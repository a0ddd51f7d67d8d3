//! Common library for the user management services
//!
//! This crate provides shared functionality used across services, including
//! database connectivity, transaction handling and the persistence error
//! type.

pub mod database;
pub mod error;

pub use error::{DatabaseError, DatabaseResult};
