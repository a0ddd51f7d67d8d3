//! Role model and related functionality

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Account role stored on every user row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Anonymous,
    /// Role given to every newly created account
    #[default]
    User,
    Authenticated,
    Manager,
    Admin,
}

impl UserRole {
    /// Column representation
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Anonymous => "ANONYMOUS",
            UserRole::User => "USER",
            UserRole::Authenticated => "AUTHENTICATED",
            UserRole::Manager => "MANAGER",
            UserRole::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored role value did not match any known role
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown user role: {0}")]
pub struct ParseRoleError(pub String);

impl FromStr for UserRole {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ANONYMOUS" => Ok(UserRole::Anonymous),
            "USER" => Ok(UserRole::User),
            "AUTHENTICATED" => Ok(UserRole::Authenticated),
            "MANAGER" => Ok(UserRole::Manager),
            "ADMIN" => Ok(UserRole::Admin),
            other => Err(ParseRoleError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_column_round_trip() {
        for role in [
            UserRole::Anonymous,
            UserRole::User,
            UserRole::Authenticated,
            UserRole::Manager,
            UserRole::Admin,
        ] {
            assert_eq!(role.as_str().parse::<UserRole>(), Ok(role));
        }
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        assert_eq!(
            "superuser".parse::<UserRole>(),
            Err(ParseRoleError("superuser".to_string()))
        );
    }

    #[test]
    fn test_role_serializes_like_column() {
        let json = serde_json::to_string(&UserRole::Authenticated).unwrap();
        assert_eq!(json, "\"AUTHENTICATED\"");
        assert_eq!(UserRole::default(), UserRole::User);
    }
}
