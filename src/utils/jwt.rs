//! JWT helpers
//!
//! HS256 tokens carrying the user's id, role and company.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    config::environment::EnvironmentConfig,
    models::user::{User, UserRole},
    utils::errors::AppError,
};

/// Token claims
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JwtClaims {
    pub sub: Uuid,
    pub email: String,
    pub role: UserRole,
    pub company_id: Option<Uuid>,
    pub full_name: String,
    pub exp: usize,
    pub iat: usize,
}

/// Signing settings
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration: u64,
}

impl From<&EnvironmentConfig> for JwtConfig {
    fn from(config: &EnvironmentConfig) -> Self {
        Self {
            secret: config.jwt_secret.clone(),
            expiration: config.jwt_expiration,
        }
    }
}

/// Issue a token for a signed-in user
pub fn generate_token(user: &User, config: &JwtConfig) -> Result<String, AppError> {
    let now = chrono::Utc::now();
    let expires_at = now + chrono::Duration::seconds(config.expiration as i64);

    let claims = JwtClaims {
        sub: user.id,
        email: user.email.clone(),
        role: user.role,
        company_id: user.company_id,
        full_name: user.full_name.clone(),
        exp: expires_at.timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_ref()),
    )
    .map_err(|e| AppError::Jwt(format!("Error generating token: {}", e)))
}

/// Verify signature and expiry
pub fn verify_token(token: &str, config: &JwtConfig) -> Result<JwtClaims, AppError> {
    decode::<JwtClaims>(
        token,
        &DecodingKey::from_secret(config.secret.as_ref()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| AppError::Unauthorized(format!("Invalid or expired token: {}", e)))
}

/// Extract the token from an `Authorization: Bearer ...` header
pub fn extract_token_from_header(auth_header: &str) -> Result<&str, AppError> {
    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("Authorization header must start with 'Bearer '".to_string()))?
        .trim();

    if token.is_empty() {
        return Err(AppError::Unauthorized("Token cannot be empty".to_string()));
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user() -> User {
        User {
            id: Uuid::new_v4(),
            email: "hr@acme.in".to_string(),
            password_hash: String::new(),
            role: UserRole::AdminHr,
            full_name: "Meera".to_string(),
            company_id: Some(Uuid::new_v4()),
            is_active: true,
            must_change_password: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret".to_string(),
            expiration: 3600,
        }
    }

    #[test]
    fn test_token_round_trip_keeps_identity() {
        let user = user();
        let token = generate_token(&user, &config()).unwrap();
        let claims = verify_token(&token, &config()).unwrap();
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.role, UserRole::AdminHr);
        assert_eq!(claims.company_id, user.company_id);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = generate_token(&user(), &config()).unwrap();
        let other = JwtConfig {
            secret: "other".to_string(),
            expiration: 3600,
        };
        assert!(matches!(verify_token(&token, &other), Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn test_extract_token_from_header() {
        assert_eq!(extract_token_from_header("Bearer abc.def.ghi").unwrap(), "abc.def.ghi");
        assert!(extract_token_from_header("Basic abc").is_err());
        assert!(extract_token_from_header("Bearer   ").is_err());
    }
}
