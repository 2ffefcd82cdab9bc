//! Visitor workflow
//!
//! Kiosk registration with duplicate detection and classification, the HR
//! visitor queue and status decisions.

use std::collections::HashMap;

use chrono::{Datelike, TimeZone, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    dto::visitor_dto::{
        RegisterVisitorRequest, RegistrationAccepted, RegistrationBlocked, UpdateVisitorStatusRequest,
        VisitorQuery, VisitorView,
    },
    middleware::auth::AuthenticatedUser,
    models::{
        analytics::VisitorStats,
        employee::{Employee, EmployeeStatus},
        user::{HostSummary, User, UserRole},
        visitor::{CandidateType, NewVisitor, Visitor, VisitorFilter, VisitorStatus},
    },
    services::stats,
    state::AppState,
    utils::{
        errors::{not_found_error, validation_error, AppError, AppResult},
        validation::normalize_optional,
    },
};

/// Outcome of a kiosk registration
#[derive(Debug)]
pub enum RegistrationOutcome {
    Accepted(RegistrationAccepted),
    Blocked(RegistrationBlocked),
}

pub struct VisitorController {
    state: AppState,
}

impl VisitorController {
    pub fn new(state: &AppState) -> Self {
        Self {
            state: state.clone(),
        }
    }

    /// Company for an anonymous kiosk request: explicit, else the configured default.
    fn kiosk_company(&self, requested: Option<Uuid>) -> AppResult<Uuid> {
        requested
            .or(self.state.config.default_company_id)
            .ok_or_else(|| validation_error("company_id", "company_id is required"))
    }

    /// Active HR and ADMIN_HR users a visitor can ask for.
    pub async fn list_hosts(
        &self,
        caller: Option<&AuthenticatedUser>,
        requested_company: Option<Uuid>,
    ) -> AppResult<Vec<HostSummary>> {
        let company_id = match caller.and_then(|c| c.company_id) {
            Some(own) => own,
            None => self.kiosk_company(requested_company)?,
        };

        let users = self.state.repos.users.list(Some(company_id), None).await?;
        let mut hosts: Vec<HostSummary> = users
            .iter()
            .filter(|u| u.is_active && u.role.is_host())
            .map(HostSummary::from)
            .collect();
        hosts.sort_by(|a, b| a.full_name.cmp(&b.full_name));
        Ok(hosts)
    }

    async fn resolve_host(&self, company_id: Uuid, hr_id: Uuid) -> AppResult<User> {
        self.state
            .repos
            .users
            .find_by_id(hr_id)
            .await?
            .filter(|u| u.is_active && u.role.is_host() && u.company_id == Some(company_id))
            .ok_or_else(|| validation_error("hr_id", "Selected host is not available"))
    }

    pub async fn register(
        &self,
        caller: Option<&AuthenticatedUser>,
        request: RegisterVisitorRequest,
    ) -> AppResult<RegistrationOutcome> {
        let company_id = match caller {
            Some(user) if !user.is_super_admin() => user.target_company(None)?,
            Some(user) => user.target_company(request.company_id)?,
            None => self.kiosk_company(request.company_id)?,
        };

        if self.state.repos.companies.find_by_id(company_id).await?.is_none() {
            return Err(validation_error("company_id", "Unknown company"));
        }

        let host = match (request.hr_id, caller) {
            (Some(hr_id), _) => Some(self.resolve_host(company_id, hr_id).await?),
            (None, Some(user)) if user.role.is_host() => {
                self.state.repos.users.find_by_id(user.user_id).await?
            }
            _ => None,
        };

        let aadhaar = request.aadhaar_number.trim().to_string();
        let phone = request.phone.trim().to_string();
        let employees = &self.state.repos.employees;

        if let Some(active) = employees
            .find_matching(company_id, EmployeeStatus::Active, &aadhaar, &phone)
            .await?
        {
            warn!(
                "⛔ Registration blocked: matches active employee {} ({})",
                active.employee_code, active.id
            );
            return Ok(RegistrationOutcome::Blocked(RegistrationBlocked {
                success: false,
                allow: false,
                reason: "Already Active Employee".to_string(),
                message: format!(
                    "{} is already an active employee ({})",
                    active.full_name, active.employee_code
                ),
                employee_id: active.id,
                employee_name: active.full_name,
            }));
        }

        let offboarded = employees
            .find_matching(company_id, EmployeeStatus::Offboarded, &aadhaar, &phone)
            .await?;
        let rejected = if offboarded.is_none() {
            self.state
                .repos
                .visitors
                .find_matching(company_id, VisitorStatus::Rejected, &aadhaar, &phone)
                .await?
        } else {
            None
        };
        let candidate_type = CandidateType::classify(offboarded.is_some(), rejected.is_some());

        let visitor = self
            .state
            .repos
            .visitors
            .create(NewVisitor {
                company_id,
                hr_id: host.as_ref().map(|h| h.id),
                full_name: request.full_name.trim().to_string(),
                phone,
                email: normalize_optional(request.email).map(|e| e.to_lowercase()),
                aadhaar_number: aadhaar,
                address: normalize_optional(request.address),
                candidate_type,
                remarks: normalize_optional(request.remarks),
            })
            .await?;

        info!(
            "🧾 Visitor {} registered as {} for company {}",
            visitor.id,
            candidate_type.as_str(),
            company_id
        );

        Ok(RegistrationOutcome::Accepted(RegistrationAccepted {
            success: true,
            allow: true,
            message: "Visitor registered successfully".to_string(),
            candidate_type,
            visitor_id: visitor.id,
            data: VisitorView::new(visitor, host.as_ref().map(HostSummary::from), offboarded.as_ref()),
        }))
    }

    /// Base filter for the caller: company scope, and own visitors for HR.
    fn visibility(&self, caller: &AuthenticatedUser, requested_company: Option<Uuid>) -> VisitorFilter {
        VisitorFilter {
            company_id: caller.scope_with(requested_company),
            hr_id: (caller.role == UserRole::Hr).then_some(caller.user_id),
            ..Default::default()
        }
    }

    fn is_visible(caller: &AuthenticatedUser, visitor: &Visitor) -> bool {
        caller.can_access_company(visitor.company_id)
            && (caller.role != UserRole::Hr || visitor.hr_id == Some(caller.user_id))
    }

    async fn find_visible(&self, caller: &AuthenticatedUser, id: Uuid) -> AppResult<Visitor> {
        self.state
            .repos
            .visitors
            .find_by_id(id)
            .await?
            .filter(|v| Self::is_visible(caller, v))
            .ok_or_else(|| not_found_error("Visitor"))
    }

    /// Attach hosts and previous employee records in two batched lookups.
    async fn with_details(&self, visitors: Vec<Visitor>, company_scope: Option<Uuid>) -> AppResult<Vec<VisitorView>> {
        let aadhaar_numbers: Vec<String> = visitors.iter().map(|v| v.aadhaar_number.clone()).collect();
        let (users, employees) = futures::try_join!(
            self.state.repos.users.list(company_scope, None),
            self.state.repos.employees.find_by_aadhaar_numbers(&aadhaar_numbers)
        )?;

        let hosts: HashMap<Uuid, HostSummary> = users.iter().map(|u| (u.id, HostSummary::from(u))).collect();
        // Newest first, so the first record per key wins.
        let mut previous: HashMap<(Uuid, &str), &Employee> = HashMap::new();
        for employee in &employees {
            previous
                .entry((employee.company_id, employee.aadhaar_number.as_str()))
                .or_insert(employee);
        }

        Ok(visitors
            .into_iter()
            .map(|v| {
                let host = v.hr_id.and_then(|id| hosts.get(&id).cloned());
                let employee = previous.get(&(v.company_id, v.aadhaar_number.as_str())).copied();
                VisitorView::new(v, host, employee)
            })
            .collect())
    }

    pub async fn list(&self, caller: &AuthenticatedUser, query: VisitorQuery) -> AppResult<Vec<VisitorView>> {
        let filter = VisitorFilter {
            status: query.status,
            candidate_type: query.candidate_type,
            ..self.visibility(caller, query.company_id)
        };
        let visitors = self.state.repos.visitors.list(&filter).await?;
        self.with_details(visitors, filter.company_id).await
    }

    pub async fn today(&self, caller: &AuthenticatedUser) -> AppResult<Vec<VisitorView>> {
        let filter = VisitorFilter {
            created_from: Some(start_of_today()),
            ..self.visibility(caller, None)
        };
        let visitors = self.state.repos.visitors.list(&filter).await?;
        self.with_details(visitors, filter.company_id).await
    }

    /// Company-wide counters (not limited to the caller's own visitors).
    pub async fn stats(&self, caller: &AuthenticatedUser, requested_company: Option<Uuid>) -> AppResult<VisitorStats> {
        let filter = VisitorFilter {
            company_id: caller.scope_with(requested_company),
            ..Default::default()
        };
        let visitors = self.state.repos.visitors.list(&filter).await?;
        Ok(stats::visitor_stats(&visitors, start_of_today()))
    }

    pub async fn get(&self, caller: &AuthenticatedUser, id: Uuid) -> AppResult<VisitorView> {
        let visitor = self.find_visible(caller, id).await?;
        let company_id = visitor.company_id;
        self.with_details(vec![visitor], Some(company_id))
            .await?
            .pop()
            .ok_or_else(|| not_found_error("Visitor"))
    }

    pub async fn update_status(
        &self,
        caller: &AuthenticatedUser,
        id: Uuid,
        request: UpdateVisitorStatusRequest,
    ) -> AppResult<Visitor> {
        let visitor = self.find_visible(caller, id).await?;

        if !visitor.status.can_transition_to(request.status) {
            return Err(AppError::BadRequest(format!(
                "Cannot change visitor status from {} to {}",
                visitor.status.as_str(),
                request.status.as_str()
            )));
        }

        let updated = self
            .state
            .repos
            .visitors
            .update_status(id, request.status, normalize_optional(request.remarks))
            .await?
            .ok_or_else(|| not_found_error("Visitor"))?;

        info!("📝 Visitor {} status {} -> {}",
            id,
            visitor.status.as_str(),
            updated.status.as_str());
        Ok(updated)
    }

    pub async fn delete(&self, caller: &AuthenticatedUser, id: Uuid) -> AppResult<()> {
        self.find_visible(caller, id).await?;
        if !self.state.repos.visitors.delete(id).await? {
            return Err(not_found_error("Visitor"));
        }
        info!("🗑️ Visitor {} deleted", id);
        Ok(())
    }
}

/// Midnight UTC of the current day.
pub fn start_of_today() -> chrono::DateTime<Utc> {
    let today = Utc::now().date_naive();
    Utc.with_ymd_and_hms(today.year(), today.month(), today.day(), 0, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}
