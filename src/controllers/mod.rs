//! Business operations behind the HTTP handlers
//!
//! Each controller borrows the shared `AppState` and takes the caller's
//! identity explicitly; role and company checks happen here.

pub mod auth_controller;
pub mod company_controller;
pub mod document_controller;
pub mod employee_controller;
pub mod letter_controller;
pub mod report_controller;
pub mod visitor_controller;

use uuid::Uuid;

use crate::{
    middleware::auth::AuthenticatedUser,
    models::employee::Employee,
    state::AppState,
    utils::errors::{not_found_error, AppResult},
};

/// Employee visible to the caller; other companies' employees are reported missing.
pub(crate) async fn scoped_employee(
    state: &AppState,
    caller: &AuthenticatedUser,
    id: Uuid,
) -> AppResult<Employee> {
    state
        .repos
        .employees
        .find_by_id(id)
        .await?
        .filter(|e| caller.can_access_company(e.company_id))
        .ok_or_else(|| not_found_error("Employee"))
}
