use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::company::Company;
use crate::repositories::CompanyStore;
use crate::utils::errors::{db_error, AppResult};

pub struct CompanyRepository {
    pool: PgPool,
}

impl CompanyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CompanyStore for CompanyRepository {
    async fn create(&self, name: &str) -> AppResult<Company> {
        sqlx::query_as::<_, Company>(
            r#"
            INSERT INTO companies (name)
            VALUES ($1)
            RETURNING *
            "#,
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Company>> {
        sqlx::query_as::<_, Company>("SELECT * FROM companies WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)
    }

    async fn list(&self) -> AppResult<Vec<Company>> {
        sqlx::query_as::<_, Company>("SELECT * FROM companies ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)
    }

    async fn rename(&self, id: Uuid, name: &str) -> AppResult<Option<Company>> {
        sqlx::query_as::<_, Company>(
            r#"
            UPDATE companies
            SET name = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM companies WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(result.rows_affected() > 0)
    }
}
