use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::user::{NewUser, User, UserRole};
use crate::repositories::UserStore;
use crate::utils::errors::{db_error, AppResult};

pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn create(&self, user: NewUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash, role, full_name, company_id, must_change_password)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role)
        .bind(&user.full_name)
        .bind(user.company_id)
        .bind(user.must_change_password)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)
    }

    async fn list(&self, company_id: Option<Uuid>, role: Option<UserRole>) -> AppResult<Vec<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT * FROM users
            WHERE ($1::uuid IS NULL OR company_id = $1)
              AND ($2::user_role IS NULL OR role = $2)
            ORDER BY created_at DESC
            "#,
        )
        .bind(company_id)
        .bind(role)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)
    }

    async fn update_full_name(&self, id: Uuid, full_name: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET full_name = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(full_name)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET password_hash = $2, must_change_password = FALSE, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(password_hash)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(())
    }

    async fn set_active(&self, id: Uuid, is_active: bool) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET is_active = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(is_active)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)
    }
}
