use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::models::employee::{Employee, EmployeeChanges, EmployeeFilter, EmployeeStatus, NewEmployee};
use crate::repositories::EmployeeStore;
use crate::utils::errors::{db_error, not_found_error, AppResult};

pub struct EmployeeRepository {
    pool: PgPool,
}

impl EmployeeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert(
        tx: &mut Transaction<'_, Postgres>,
        employee: &NewEmployee,
    ) -> AppResult<Employee> {
        sqlx::query_as::<_, Employee>(
            r#"
            INSERT INTO employees (
                company_id, employee_code, visitor_id, full_name, phone, email,
                aadhaar_number, department, designation, status, date_of_joining
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'ACTIVE', $10)
            RETURNING *
            "#,
        )
        .bind(employee.company_id)
        .bind(&employee.employee_code)
        .bind(employee.visitor_id)
        .bind(&employee.full_name)
        .bind(&employee.phone)
        .bind(&employee.email)
        .bind(&employee.aadhaar_number)
        .bind(&employee.department)
        .bind(&employee.designation)
        .bind(employee.date_of_joining)
        .fetch_one(&mut **tx)
        .await
        .map_err(db_error)
    }
}

#[async_trait]
impl EmployeeStore for EmployeeRepository {
    async fn find_matching(
        &self,
        company_id: Uuid,
        status: EmployeeStatus,
        aadhaar_number: &str,
        phone: &str,
    ) -> AppResult<Option<Employee>> {
        sqlx::query_as::<_, Employee>(
            r#"
            SELECT * FROM employees
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

    async fn find_active_by_aadhaar(
        &self,
        company_id: Uuid,
        aadhaar_number: &str,
    ) -> AppResult<Option<Employee>> {
        sqlx::query_as::<_, Employee>(
            r#"
            SELECT * FROM employees
            WHERE company_id = $1 AND aadhaar_number = $2 AND status = 'ACTIVE'
            LIMIT 1
            "#,
        )
        .bind(company_id)
        .bind(aadhaar_number)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)
    }

    async fn find_by_aadhaar_numbers(&self, aadhaar_numbers: &[String]) -> AppResult<Vec<Employee>> {
        if aadhaar_numbers.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, Employee>(
            r#"
            SELECT * FROM employees
            WHERE aadhaar_number = ANY($1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(aadhaar_numbers)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)
    }

    async fn codes_with_prefix(&self, company_id: Uuid, prefix: &str) -> AppResult<Vec<String>> {
        let rows: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT employee_code FROM employees
            WHERE company_id = $1 AND starts_with(employee_code, $2)
            "#,
        )
        .bind(company_id)
        .bind(prefix)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(rows.into_iter().map(|(code,)| code).collect())
    }

    async fn create(&self, employee: NewEmployee) -> AppResult<Employee> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;
        let created = Self::insert(&mut tx, &employee).await?;
        tx.commit().await.map_err(db_error)?;
        Ok(created)
    }

    async fn convert_visitor(&self, visitor_id: Uuid, employee: NewEmployee) -> AppResult<Employee> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        let created = Self::insert(&mut tx, &employee).await?;

        let updated = sqlx::query(
            r#"
            UPDATE visitors
            SET status = 'SELECTED', updated_at = NOW()
            WHERE id = $1 AND company_id = $2
            "#,
        )
        .bind(visitor_id)
        .bind(employee.company_id)
        .execute(&mut *tx)
        .await
        .map_err(db_error)?;

        if updated.rows_affected() == 0 {
            // dropping tx rolls back the insert
            return Err(not_found_error("Visitor"));
        }

        tx.commit().await.map_err(db_error)?;
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Employee>> {
        sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)
    }

    async fn list(&self, filter: &EmployeeFilter) -> AppResult<Vec<Employee>> {
        sqlx::query_as::<_, Employee>(
            r#"
            SELECT * FROM employees
            WHERE ($1::uuid IS NULL OR company_id = $1)
              AND ($2::employee_status IS NULL OR status = $2)
              AND ($3::text IS NULL OR department = $3)
            ORDER BY created_at DESC
            "#,
        )
        .bind(filter.company_id)
        .bind(filter.status)
        .bind(filter.department.as_deref())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)
    }

    async fn update(&self, id: Uuid, changes: EmployeeChanges) -> AppResult<Option<Employee>> {
        sqlx::query_as::<_, Employee>(
            r#"
            UPDATE employees
            SET full_name = COALESCE($2, full_name),
                phone = COALESCE($3, phone),
                email = COALESCE($4, email),
                aadhaar_number = COALESCE($5, aadhaar_number),
                department = COALESCE($6, department),
                designation = COALESCE($7, designation),
                date_of_joining = COALESCE($8, date_of_joining),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(changes.full_name)
        .bind(changes.phone)
        .bind(changes.email)
        .bind(changes.aadhaar_number)
        .bind(changes.department)
        .bind(changes.designation)
        .bind(changes.date_of_joining)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)
    }

    async fn offboard(&self, id: Uuid, date_of_leaving: NaiveDate) -> AppResult<Option<Employee>> {
        sqlx::query_as::<_, Employee>(
            r#"
            UPDATE employees
            SET status = 'OFFBOARDED', date_of_leaving = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(date_of_leaving)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(result.rows_affected() > 0)
    }
}
