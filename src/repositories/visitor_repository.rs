use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::visitor::{NewVisitor, Visitor, VisitorFilter, VisitorStatus};
use crate::repositories::VisitorStore;
use crate::utils::errors::{db_error, AppResult};

pub struct VisitorRepository {
    pool: PgPool,
}

impl VisitorRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VisitorStore for VisitorRepository {
    async fn find_matching(
        &self,
        company_id: Uuid,
        status: VisitorStatus,
        aadhaar_number: &str,
        phone: &str,
    ) -> AppResult<Option<Visitor>> {
        sqlx::query_as::<_, Visitor>(
            r#"
            SELECT * FROM visitors
            WHERE company_id = $1
              AND status = $2
              AND (aadhaar_number = $3 OR phone = $4)
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(company_id)
        .bind(status)
        .bind(aadhaar_number)
        .bind(phone)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)
    }

    async fn create(&self, visitor: NewVisitor) -> AppResult<Visitor> {
        sqlx::query_as::<_, Visitor>(
            r#"
            INSERT INTO visitors (
                company_id, hr_id, full_name, phone, email, aadhaar_number,
                address, candidate_type, status, remarks
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'PENDING', $9)
            RETURNING *
            "#,
        )
        .bind(visitor.company_id)
        .bind(visitor.hr_id)
        .bind(&visitor.full_name)
        .bind(&visitor.phone)
        .bind(&visitor.email)
        .bind(&visitor.aadhaar_number)
        .bind(&visitor.address)
        .bind(visitor.candidate_type)
        .bind(&visitor.remarks)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Visitor>> {
        sqlx::query_as::<_, Visitor>("SELECT * FROM visitors WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)
    }

    async fn list(&self, filter: &VisitorFilter) -> AppResult<Vec<Visitor>> {
        sqlx::query_as::<_, Visitor>(
            r#"
            SELECT * FROM visitors
            WHERE ($1::uuid IS NULL OR company_id = $1)
              AND ($2::visitor_status IS NULL OR status = $2)
              AND ($3::candidate_type IS NULL OR candidate_type = $3)
              AND ($4::uuid IS NULL OR hr_id = $4)
              AND ($5::timestamptz IS NULL OR created_at >= $5)
              AND ($6::timestamptz IS NULL OR created_at < $6)
            ORDER BY created_at DESC
            "#,
        )
        .bind(filter.company_id)
        .bind(filter.status)
        .bind(filter.candidate_type)
        .bind(filter.hr_id)
        .bind(filter.created_from)
        .bind(filter.created_before)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: VisitorStatus,
        remarks: Option<String>,
    ) -> AppResult<Option<Visitor>> {
        sqlx::query_as::<_, Visitor>(
            r#"
            UPDATE visitors
            SET status = $2, remarks = COALESCE($3, remarks), updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(remarks)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM visitors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(result.rows_affected() > 0)
    }
}
