use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::document::{EmployeeDocument, NewDocument};
use crate::repositories::DocumentStore;
use crate::utils::errors::{db_error, AppResult};

pub struct DocumentRepository {
    pool: PgPool,
}

impl DocumentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore for DocumentRepository {
    async fn create(&self, document: NewDocument) -> AppResult<EmployeeDocument> {
        sqlx::query_as::<_, EmployeeDocument>(
            r#"
            INSERT INTO employee_documents (
                employee_id, document_type, file_name, file_path, file_url, content_type, uploaded_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(document.employee_id)
        .bind(&document.document_type)
        .bind(&document.file_name)
        .bind(&document.file_path)
        .bind(&document.file_url)
        .bind(&document.content_type)
        .bind(document.uploaded_by)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)
    }

    async fn list_for_employee(&self, employee_id: Uuid) -> AppResult<Vec<EmployeeDocument>> {
        sqlx::query_as::<_, EmployeeDocument>(
            "SELECT * FROM employee_documents WHERE employee_id = $1 ORDER BY created_at DESC",
        )
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)
    }

    async fn find(&self, employee_id: Uuid, id: Uuid) -> AppResult<Option<EmployeeDocument>> {
        sqlx::query_as::<_, EmployeeDocument>(
            "SELECT * FROM employee_documents WHERE id = $1 AND employee_id = $2",
        )
        .bind(id)
        .bind(employee_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM employee_documents WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(result.rows_affected() > 0)
    }
}
