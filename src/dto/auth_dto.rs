use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::user::{UserResponse, UserRole};

// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserResponse,
}

/// `POST /auth/register`
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterUserRequest {
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[validate(length(min = 1, max = 255, message = "Full name is required"))]
    pub full_name: String,
    pub role: UserRole,
    pub company_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 255, message = "Full name is required"))]
    pub full_name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[serde(alias = "currentPassword")]
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,
    #[serde(alias = "newPassword")]
    #[validate(length(min = 8, message = "New password must be at least 8 characters"))]
    pub new_password: String,
}

// Filters of `GET /auth/users`
#[derive(Debug, Default, Deserialize)]
pub struct UsersQuery {
    pub role: Option<UserRole>,
    pub company_id: Option<Uuid>,
}
