//! Password hashing
//!
//! bcrypt is CPU bound, so both operations run on the blocking pool.

use crate::utils::errors::{AppError, AppResult};

pub async fn hash_password(password: &str, cost: u32) -> AppResult<String> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| AppError::Internal(format!("hashing task failed: {}", e)))?
        .map_err(|e| AppError::Hash(e.to_string()))
}

pub async fn verify_password(password: &str, password_hash: &str) -> AppResult<bool> {
    let password = password.to_string();
    let password_hash = password_hash.to_string();
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &password_hash))
        .await
        .map_err(|e| AppError::Internal(format!("verify task failed: {}", e)))?
        .map_err(|e| AppError::Hash(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hash_and_verify() {
        let hash = hash_password("Welcome@2024", 4).await.unwrap();
        assert_ne!(hash, "Welcome@2024");
        assert!(verify_password("Welcome@2024", &hash).await.unwrap());
        assert!(!verify_password("wrong", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_verify_against_garbage_hash_is_error() {
        assert!(matches!(
            verify_password("x", "not-a-bcrypt-hash").await,
            Err(AppError::Hash(_))
        ));
    }
}
