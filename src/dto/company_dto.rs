use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

// Create or rename a company
#[derive(Debug, Deserialize, Validate)]
pub struct CompanyRequest {
    #[validate(length(min = 1, max = 255, message = "Company name is required"))]
    pub name: String,
}

/// `?company_id=` on stats, reports and the public host list
#[derive(Debug, Default, Deserialize)]
pub struct CompanyScopeQuery {
    pub company_id: Option<Uuid>,
}
