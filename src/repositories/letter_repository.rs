use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::letter::{
    GeneratedLetter, LetterTemplate, LetterType, NewGeneratedLetter, TemplateChanges,
    TemplateFilter,
};
use crate::repositories::LetterStore;
use crate::utils::errors::{db_error, AppResult};

pub struct LetterRepository {
    pool: PgPool,
}

impl LetterRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LetterStore for LetterRepository {
    async fn create_template(
        &self,
        company_id: Uuid,
        letter_type: LetterType,
        name: &str,
        content: &str,
    ) -> AppResult<LetterTemplate> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        // Lock the type's rows so concurrent creations serialize on the version.
        let (latest,): (Option<i32>,) = sqlx::query_as(
            r#"
            SELECT MAX(version) FROM (
                SELECT version FROM letter_templates
                WHERE company_id = $1 AND type = $2
                FOR UPDATE
            ) AS versions
            "#,
        )
        .bind(company_id)
        .bind(letter_type)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_error)?;

        sqlx::query(
            r#"
            UPDATE letter_templates
            SET is_active = FALSE, updated_at = NOW()
            WHERE company_id = $1 AND type = $2 AND is_active
            "#,
        )
        .bind(company_id)
        .bind(letter_type)
        .execute(&mut *tx)
        .await
        .map_err(db_error)?;

        let template = sqlx::query_as::<_, LetterTemplate>(
            r#"
            INSERT INTO letter_templates (company_id, type, name, content, version, is_active)
            VALUES ($1, $2, $3, $4, $5, TRUE)
            RETURNING *
            "#,
        )
        .bind(company_id)
        .bind(letter_type)
        .bind(name)
        .bind(content)
        .bind(latest.unwrap_or(0) + 1)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_error)?;

        tx.commit().await.map_err(db_error)?;
        Ok(template)
    }

    async fn find_template(&self, id: Uuid) -> AppResult<Option<LetterTemplate>> {
        sqlx::query_as::<_, LetterTemplate>("SELECT * FROM letter_templates WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)
    }

    async fn active_template(
        &self,
        company_id: Uuid,
        letter_type: LetterType,
    ) -> AppResult<Option<LetterTemplate>> {
        sqlx::query_as::<_, LetterTemplate>(
            r#"
            SELECT * FROM letter_templates
            WHERE company_id = $1 AND type = $2 AND is_active
            LIMIT 1
            "#,
        )
        .bind(company_id)
        .bind(letter_type)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)
    }

    async fn list_templates(&self, filter: &TemplateFilter) -> AppResult<Vec<LetterTemplate>> {
        sqlx::query_as::<_, LetterTemplate>(
            r#"
            SELECT * FROM letter_templates
            WHERE ($1::uuid IS NULL OR company_id = $1)
              AND ($2::letter_type IS NULL OR type = $2)
              AND ($3::boolean IS NULL OR is_active = $3)
            ORDER BY type, version DESC
            "#,
        )
        .bind(filter.company_id)
        .bind(filter.letter_type)
        .bind(filter.is_active)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)
    }

    async fn update_template(
        &self,
        id: Uuid,
        changes: TemplateChanges,
    ) -> AppResult<Option<LetterTemplate>> {
        sqlx::query_as::<_, LetterTemplate>(
            r#"
            UPDATE letter_templates
            SET name = COALESCE($2, name),
                content = COALESCE($3, content),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(changes.name)
        .bind(changes.content)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)
    }

    async fn set_template_active(&self, id: Uuid, is_active: bool) -> AppResult<Option<LetterTemplate>> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        if is_active {
            sqlx::query(
                r#"
                UPDATE letter_templates AS t
                SET is_active = FALSE, updated_at = NOW()
                FROM letter_templates AS target
                WHERE target.id = $1
                  AND t.company_id = target.company_id
                  AND t.type = target.type
                  AND t.id <> target.id
                  AND t.is_active
                "#,
            )
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;
        }

        let template = sqlx::query_as::<_, LetterTemplate>(
            r#"
            UPDATE letter_templates
            SET is_active = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(is_active)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_error)?;

        tx.commit().await.map_err(db_error)?;
        Ok(template)
    }

    async fn delete_template(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM letter_templates WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn create_letter(&self, letter: NewGeneratedLetter) -> AppResult<GeneratedLetter> {
        sqlx::query_as::<_, GeneratedLetter>(
            r#"
            INSERT INTO generated_letters (
                employee_id, template_id, generated_content, file_path, file_url, generated_by
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(letter.employee_id)
        .bind(letter.template_id)
        .bind(&letter.generated_content)
        .bind(&letter.file_path)
        .bind(&letter.file_url)
        .bind(letter.generated_by)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)
    }

    async fn list_letters(&self, employee_id: Uuid) -> AppResult<Vec<GeneratedLetter>> {
        sqlx::query_as::<_, GeneratedLetter>(
            "SELECT * FROM generated_letters WHERE employee_id = $1 ORDER BY created_at DESC",
        )
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)
    }
}
