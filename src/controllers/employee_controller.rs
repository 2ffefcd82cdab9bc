//! Employee management
//!
//! Visitor conversion, direct creation, updates and offboarding. Employee
//! codes are generated here and regenerated when the insert races another
//! one for the same code.

use chrono::{Datelike, NaiveDate, Utc};
use futures::future::join_all;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    controllers::scoped_employee,
    dto::employee_dto::{
        ConversionResult, ConvertVisitorRequest, CreateEmployeeRequest, EmployeeDetail,
        EmployeeQuery, OffboardRequest, UpdateEmployeeRequest,
    },
    middleware::auth::AuthenticatedUser,
    models::{
        analytics::EmployeeStats,
        employee::{Employee, EmployeeChanges, EmployeeFilter, EmployeeStatus, NewEmployee},
        user::{NewUser, User, UserRole},
        visitor::Visitor,
    },
    repositories::constraints,
    services::{employee_code, password::hash_password, stats},
    state::AppState,
    utils::{
        errors::{not_found_error, AppError, AppResult},
        validation::normalize_optional,
    },
};

/// Attempts at inserting with a freshly generated code.
const MAX_CODE_ATTEMPTS: usize = 3;

fn active_duplicate() -> AppError {
    AppError::Conflict("An active employee with this Aadhaar number already exists".to_string())
}

pub struct EmployeeController {
    state: AppState,
}

impl EmployeeController {
    pub fn new(state: &AppState) -> Self {
        Self {
            state: state.clone(),
        }
    }

    async fn next_code(&self, company_id: Uuid, year: i32) -> AppResult<String> {
        let company = self
            .state
            .repos
            .companies
            .find_by_id(company_id)
            .await?
            .ok_or_else(|| not_found_error("Company"))?;

        let prefix = employee_code::code_prefix(&company.name);
        let existing = self
            .state
            .repos
            .employees
            .codes_with_prefix(company_id, &employee_code::year_prefix(&prefix, year))
            .await?;

        Ok(employee_code::next_code(
            existing.iter().map(String::as_str),
            &company.name,
            year,
        ))
    }

    /// Generate a code and insert, retrying on code collisions.
    async fn insert_with_code(&self, template: NewEmployee) -> AppResult<Employee> {
        let year = Utc::now().year();
        let mut attempt = 0;

        loop {
            attempt += 1;
            let code = self.next_code(template.company_id, year).await?;
            let employee = NewEmployee {
                employee_code: code.clone(),
                ..template.clone()
            };

            let result = match employee.visitor_id {
                Some(visitor_id) => {
                    self.state
                        .repos
                        .employees
                        .convert_visitor(visitor_id, employee)
                        .await
                }
                None => self.state.repos.employees.create(employee).await,
            };

            match result {
                Err(e) if e.is_duplicate_of(constraints::EMPLOYEE_CODE) && attempt < MAX_CODE_ATTEMPTS => {
                    warn!("🔁 Employee code {} taken, regenerating (attempt {})", code, attempt);
                }
                Err(e) if e.is_duplicate_of(constraints::EMPLOYEE_CODE) => {
                    return Err(AppError::Conflict(
                        "Could not allocate a unique employee code, please retry".to_string(),
                    ));
                }
                Err(e) if e.is_duplicate_of(constraints::ACTIVE_AADHAAR) => return Err(active_duplicate()),
                other => return other,
            }
        }
    }

    pub async fn convert(
        &self,
        caller: &AuthenticatedUser,
        visitor_id: Uuid,
        request: ConvertVisitorRequest,
    ) -> AppResult<ConversionResult> {
        let visitor = self
            .state
            .repos
            .visitors
            .find_by_id(visitor_id)
            .await?
            .filter(|v| caller.can_access_company(v.company_id))
            .ok_or_else(|| not_found_error("Visitor"))?;

        if self
            .state
            .repos
            .employees
            .find_active_by_aadhaar(visitor.company_id, &visitor.aadhaar_number)
            .await?
            .is_some()
        {
            return Err(active_duplicate());
        }

        let employee = self
            .insert_with_code(NewEmployee {
                company_id: visitor.company_id,
                employee_code: String::new(),
                visitor_id: Some(visitor.id),
                full_name: visitor.full_name.clone(),
                phone: visitor.phone.clone(),
                email: visitor.email.clone(),
                aadhaar_number: visitor.aadhaar_number.clone(),
                department: normalize_optional(request.department),
                designation: normalize_optional(request.designation),
                date_of_joining: request
                    .date_of_joining
                    .unwrap_or_else(|| Utc::now().date_naive()),
            })
            .await?;

        info!(
            "🎉 Visitor {} converted to employee {} ({})",
            visitor.id, employee.employee_code, employee.id
        );

        let account_created = self.provision_account(&visitor).await;
        Ok(ConversionResult {
            employee,
            account_created,
        })
    }

    /// Best effort: create an HR login for the new employee. Never fails the conversion.
    async fn provision_account(&self, visitor: &Visitor) -> bool {
        let Some(email) = visitor.email.as_deref() else {
            warn!("⚠️ No account created for visitor {}: no email on record", visitor.id);
            return false;
        };

        match self.create_account(email, visitor).await {
            Ok(user) => {
                info!("👤 Account {} created for {}", user.id, user.email);
                true
            }
            Err(e) => {
                warn!("⚠️ Account creation for {} failed: {}", email, e);
                false
            }
        }
    }

    async fn create_account(&self, email: &str, visitor: &Visitor) -> AppResult<User> {
        if self.state.repos.users.find_by_email(email).await?.is_some() {
            return Err(AppError::Conflict("email already registered".to_string()));
        }

        let password_hash = hash_password(
            &self.state.config.default_employee_password,
            self.state.config.bcrypt_cost,
        )
        .await?;

        self.state
            .repos
            .users
            .create(NewUser {
                email: email.to_string(),
                password_hash,
                role: UserRole::Hr,
                full_name: visitor.full_name.clone(),
                company_id: Some(visitor.company_id),
                must_change_password: true,
            })
            .await
    }

    pub async fn create(&self, caller: &AuthenticatedUser, request: CreateEmployeeRequest) -> AppResult<Employee> {
        let company_id = caller.target_company(request.company_id)?;
        let aadhaar = request.aadhaar_number.trim().to_string();

        if self
            .state
            .repos
            .employees
            .find_active_by_aadhaar(company_id, &aadhaar)
            .await?
            .is_some()
        {
            return Err(active_duplicate());
        }

        let employee = self
            .insert_with_code(NewEmployee {
                company_id,
                employee_code: String::new(),
                visitor_id: None,
                full_name: request.full_name.trim().to_string(),
                phone: request.phone.trim().to_string(),
                email: normalize_optional(request.email).map(|e| e.to_lowercase()),
                aadhaar_number: aadhaar,
                department: normalize_optional(request.department),
                designation: normalize_optional(request.designation),
                date_of_joining: request
                    .date_of_joining
                    .unwrap_or_else(|| Utc::now().date_naive()),
            })
            .await?;

        info!("👷 Employee {} created ({})", employee.employee_code, employee.id);
        Ok(employee)
    }

    pub async fn list(&self, caller: &AuthenticatedUser, query: EmployeeQuery) -> AppResult<Vec<Employee>> {
        let filter = EmployeeFilter {
            company_id: caller.scope_with(query.company_id),
            status: query.status,
            department: normalize_optional(query.department),
        };
        self.state.repos.employees.list(&filter).await
    }

    pub async fn stats(&self, caller: &AuthenticatedUser, requested_company: Option<Uuid>) -> AppResult<EmployeeStats> {
        let filter = EmployeeFilter {
            company_id: caller.scope_with(requested_company),
            ..Default::default()
        };
        let employees = self.state.repos.employees.list(&filter).await?;
        Ok(stats::employee_stats(&employees))
    }

    pub async fn get(&self, caller: &AuthenticatedUser, id: Uuid) -> AppResult<EmployeeDetail> {
        let employee = scoped_employee(&self.state, caller, id).await?;
        let documents = self.state.repos.documents.list_for_employee(id).await?;
        let letters = self.state.repos.letters.list_letters(id).await?;
        Ok(EmployeeDetail {
            employee,
            documents,
            letters,
        })
    }

    pub async fn update(
        &self,
        caller: &AuthenticatedUser,
        id: Uuid,
        request: UpdateEmployeeRequest,
    ) -> AppResult<Employee> {
        scoped_employee(&self.state, caller, id).await?;

        let changes = EmployeeChanges::from(request);
        if changes.is_empty() {
            return Err(AppError::BadRequest("No fields to update".to_string()));
        }

        match self.state.repos.employees.update(id, changes).await {
            Ok(Some(employee)) => Ok(employee),
            Ok(None) => Err(not_found_error("Employee")),
            Err(e) if e.is_duplicate_of(constraints::ACTIVE_AADHAAR) => Err(active_duplicate()),
            Err(e) => Err(e),
        }
    }

    pub async fn offboard(
        &self,
        caller: &AuthenticatedUser,
        id: Uuid,
        request: OffboardRequest,
    ) -> AppResult<Employee> {
        let employee = scoped_employee(&self.state, caller, id).await?;
        if employee.status == EmployeeStatus::Offboarded {
            return Err(AppError::BadRequest("Employee is already offboarded".to_string()));
        }

        let date_of_leaving: NaiveDate = request
            .date_of_leaving
            .unwrap_or_else(|| Utc::now().date_naive());
        if date_of_leaving < employee.date_of_joining {
            return Err(AppError::BadRequest(
                "Date of leaving cannot be before the date of joining".to_string(),
            ));
        }

        let updated = self
            .state
            .repos
            .employees
            .offboard(id, date_of_leaving)
            .await?
            .ok_or_else(|| not_found_error("Employee"))?;

        info!("👋 Employee {} offboarded on {}", updated.employee_code, date_of_leaving);
        Ok(updated)
    }

    /// Delete the employee; documents and letters go with it, files included.
    pub async fn delete(&self, caller: &AuthenticatedUser, id: Uuid) -> AppResult<()> {
        scoped_employee(&self.state, caller, id).await?;

        let mut paths: Vec<String> = self
            .state
            .repos
            .documents
            .list_for_employee(id)
            .await?
            .into_iter()
            .map(|d| d.file_path)
            .collect();
        paths.extend(
            self.state
                .repos
                .letters
                .list_letters(id)
                .await?
                .into_iter()
                .map(|l| l.file_path),
        );

        if !self.state.repos.employees.delete(id).await? {
            return Err(not_found_error("Employee"));
        }

        let storage = &self.state.storage;
        let removals = join_all(paths.iter().map(|path| storage.remove(path))).await;
        for (path, result) in paths.iter().zip(removals) {
            if let Err(e) = result {
                warn!("⚠️ Could not remove {} after deleting employee {}: {}", path, id, e);
            }
        }

        info!("🗑️ Employee {} deleted", id);
        Ok(())
    }
}
