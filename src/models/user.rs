//! User model
//!
//! HR actors who sign in to the dashboard. Maps to the `users` table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Role of a dashboard user - maps to the `user_role` enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "user_role", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    SuperAdmin,
    AdminHr,
    Hr,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::SuperAdmin => "SUPER_ADMIN",
            UserRole::AdminHr => "ADMIN_HR",
            UserRole::Hr => "HR",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "SUPER_ADMIN" => Some(UserRole::SuperAdmin),
            "ADMIN_HR" => Some(UserRole::AdminHr),
            "HR" => Some(UserRole::Hr),
            _ => None,
        }
    }

    /// Roles that can host visitors.
    pub fn is_host(&self) -> bool {
        matches!(self, UserRole::AdminHr | UserRole::Hr)
    }
}

/// User row
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: UserRole,
    pub full_name: String,
    pub company_id: Option<Uuid>,
    pub is_active: bool,
    pub must_change_password: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Values for inserting a user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub full_name: String,
    pub company_id: Option<Uuid>,
    pub must_change_password: bool,
}

/// User as returned by the API (no password hash)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub role: UserRole,
    pub full_name: String,
    pub company_id: Option<Uuid>,
    pub is_active: bool,
    pub must_change_password: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            role: user.role,
            full_name: user.full_name,
            company_id: user.company_id,
            is_active: user.is_active,
            must_change_password: user.must_change_password,
            created_at: user.created_at,
        }
    }
}

/// Visitor host as shown on the kiosk and on visitor records
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HostSummary {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub role: UserRole,
}

impl From<&User> for HostSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serialization_matches_database_labels() {
        assert_eq!(serde_json::to_string(&UserRole::AdminHr).unwrap(), "\"ADMIN_HR\"");
        assert_eq!(serde_json::to_string(&UserRole::SuperAdmin).unwrap(), "\"SUPER_ADMIN\"");
        for role in [UserRole::SuperAdmin, UserRole::AdminHr, UserRole::Hr] {
            assert_eq!(UserRole::parse(role.as_str()), Some(role));
        }
        assert_eq!(UserRole::parse("admin"), None);
    }

    #[test]
    fn test_host_roles() {
        assert!(UserRole::Hr.is_host());
        assert!(UserRole::AdminHr.is_host());
        assert!(!UserRole::SuperAdmin.is_host());
    }
}
