//! Company (tenant) administration

use tracing::info;
use uuid::Uuid;

use crate::{
    dto::company_dto::CompanyRequest,
    middleware::auth::AuthenticatedUser,
    models::{
        analytics::CompanyStats,
        company::Company,
        employee::EmployeeFilter,
        visitor::VisitorFilter,
    },
    repositories::constraints,
    services::stats,
    state::AppState,
    utils::errors::{forbidden_error, not_found_error, AppError, AppResult},
};

fn name_taken(e: AppError) -> AppError {
    if e.is_duplicate_of(constraints::COMPANY_NAME) {
        AppError::Conflict("A company with this name already exists".to_string())
    } else {
        e
    }
}

pub struct CompanyController {
    state: AppState,
}

impl CompanyController {
    pub fn new(state: &AppState) -> Self {
        Self {
            state: state.clone(),
        }
    }

    pub async fn list(&self) -> AppResult<Vec<Company>> {
        self.state.repos.companies.list().await
    }

    pub async fn create(&self, request: CompanyRequest) -> AppResult<Company> {
        let company = self
            .state
            .repos
            .companies
            .create(request.name.trim())
            .await
            .map_err(name_taken)?;
        info!("🏢 Company {} created ({})", company.name, company.id);
        Ok(company)
    }

    pub async fn get(&self, caller: &AuthenticatedUser, id: Uuid) -> AppResult<Company> {
        if !caller.can_access_company(id) {
            return Err(forbidden_error("view company", "not your company"));
        }
        self.state
            .repos
            .companies
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Company"))
    }

    pub async fn stats(&self, caller: &AuthenticatedUser, id: Uuid) -> AppResult<CompanyStats> {
        self.get(caller, id).await?;

        let employee_filter = EmployeeFilter {
            company_id: Some(id),
            ..Default::default()
        };
        let visitor_filter = VisitorFilter {
            company_id: Some(id),
            ..Default::default()
        };
        let (employees, visitors, users) = futures::try_join!(
            self.state.repos.employees.list(&employee_filter),
            self.state.repos.visitors.list(&visitor_filter),
            self.state.repos.users.list(Some(id), None)
        )?;

        Ok(stats::company_stats(&employees, &visitors, &users))
    }

    pub async fn update(&self, id: Uuid, request: CompanyRequest) -> AppResult<Company> {
        let company = self
            .state
            .repos
            .companies
            .rename(id, request.name.trim())
            .await
            .map_err(name_taken)?
            .ok_or_else(|| not_found_error("Company"))?;
        info!("🏢 Company {} renamed to {}", id, company.name);
        Ok(company)
    }

    /// Refused while users still belong to the company.
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        if !self.state.repos.users.list(Some(id), None).await?.is_empty() {
            return Err(AppError::Conflict(
                "Company still has users; remove them first".to_string(),
            ));
        }

        if !self.state.repos.companies.delete(id).await? {
            return Err(not_found_error("Company"));
        }
        info!("🗑️ Company {} deleted", id);
        Ok(())
    }
}
