//! Analytics report

use chrono::Utc;
use uuid::Uuid;

use crate::{
    middleware::auth::AuthenticatedUser,
    models::{analytics::AnalyticsReport, employee::EmployeeFilter, visitor::VisitorFilter},
    services::stats,
    state::AppState,
    utils::errors::AppResult,
};

pub struct ReportController {
    state: AppState,
}

impl ReportController {
    pub fn new(state: &AppState) -> Self {
        Self {
            state: state.clone(),
        }
    }

    /// Headline numbers, six-month hiring trend and top departments.
    pub async fn analytics(&self, caller: &AuthenticatedUser, requested_company: Option<Uuid>) -> AppResult<AnalyticsReport> {
        let company_id = caller.scope_with(requested_company);

        let employee_filter = EmployeeFilter {
            company_id,
            ..Default::default()
        };
        let visitor_filter = VisitorFilter {
            company_id,
            ..Default::default()
        };
        let (employees, visitors) = futures::try_join!(
            self.state.repos.employees.list(&employee_filter),
            self.state.repos.visitors.list(&visitor_filter)
        )?;

        Ok(stats::analytics_report(&employees, &visitors, Utc::now().date_naive()))
    }
}
