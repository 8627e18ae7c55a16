//! User role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Roles known to the system.
///
/// Only `Admin` carries extra privileges; `Driver` and `User` differ in which
/// push notifications they receive when an alert is raised.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Civilian road user.
    #[default]
    User,
    /// Dispatcher / administrator.
    Admin,
    /// Emergency vehicle driver.
    Driver,
}

impl UserRole {
    /// All roles, in display order.
    pub const ALL: [UserRole; 3] = [Self::User, Self::Admin, Self::Driver];

    /// Check if this role is an admin.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
            Self::Driver => "driver",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = resqroute_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            "driver" => Ok(Self::Driver),
            _ => Err(resqroute_core::AppError::validation("Invalid role")),
        }
    }
}
