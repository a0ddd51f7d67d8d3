//! User service configuration

use std::env;

/// Pagination limits applied by [`crate::service::UserService::list_users`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserServiceConfig {
    /// Page size used when the caller does not ask for one
    pub default_page_size: u32,
    /// Upper bound on any requested page size
    pub max_page_size: u32,
}

impl Default for UserServiceConfig {
    fn default() -> Self {
        Self {
            default_page_size: 10,
            max_page_size: 100,
        }
    }
}

impl UserServiceConfig {
    /// Create a new UserServiceConfig from environment variables
    ///
    /// # Environment Variables
    /// - `USERS_DEFAULT_PAGE_SIZE`: Page size when none is requested (default: 10)
    /// - `USERS_MAX_PAGE_SIZE`: Largest page size allowed (default: 100)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let max_page_size = env::var("USERS_MAX_PAGE_SIZE")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|size: &u32| *size > 0)
            .unwrap_or(defaults.max_page_size);

        let default_page_size = env::var("USERS_DEFAULT_PAGE_SIZE")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|size: &u32| *size > 0)
            .unwrap_or(defaults.default_page_size)
            .min(max_page_size);

        Self {
            default_page_size,
            max_page_size,
        }
    }
}
