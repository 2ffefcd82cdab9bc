//! Visitor requests and views

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::{
    employee::{Employee, PreviousEmployee},
    user::HostSummary,
    visitor::{CandidateType, Visitor, VisitorStatus},
};
use crate::utils::validation::{AADHAAR_REGEX, PHONE_REGEX};

/// Kiosk registration form
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterVisitorRequest {
    #[validate(length(min = 2, max = 255, message = "Full name must be at least 2 characters"))]
    pub full_name: String,
    #[validate(regex(path = "PHONE_REGEX", message = "Phone must be 10 digits"))]
    pub phone: String,
    #[validate(email(message = "Invalid email"))]
    pub email: Option<String>,
    #[validate(regex(path = "AADHAAR_REGEX", message = "Aadhaar number must be 12 digits"))]
    pub aadhaar_number: String,
    pub address: Option<String>,
    pub remarks: Option<String>,
    pub hr_id: Option<Uuid>,
    pub company_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateVisitorStatusRequest {
    pub status: VisitorStatus,
    #[validate(length(max = 2000, message = "Remarks are too long"))]
    pub remarks: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct VisitorQuery {
    pub status: Option<VisitorStatus>,
    pub candidate_type: Option<CandidateType>,
    pub company_id: Option<Uuid>,
}

/// Visitor with its host and any employee record sharing its aadhaar
#[derive(Debug, Serialize)]
pub struct VisitorView {
    #[serde(flatten)]
    pub visitor: Visitor,
    pub hr: Option<HostSummary>,
    pub previous_employee_flag: bool,
    pub previous_employee: Option<PreviousEmployee>,
}

impl VisitorView {
    pub fn new(visitor: Visitor, hr: Option<HostSummary>, previous: Option<&Employee>) -> Self {
        let previous_employee = previous.map(PreviousEmployee::from);
        Self {
            visitor,
            hr,
            previous_employee_flag: previous_employee.is_some(),
            previous_employee,
        }
    }
}

/// `201` body of an accepted registration
#[derive(Debug, Serialize)]
pub struct RegistrationAccepted {
    pub success: bool,
    pub allow: bool,
    pub message: String,
    pub candidate_type: CandidateType,
    pub visitor_id: Uuid,
    pub data: VisitorView,
}

/// `409` body when the person is already an active employee
#[derive(Debug, Serialize)]
pub struct RegistrationBlocked {
    pub success: bool,
    pub allow: bool,
    pub reason: String,
    pub message: String,
    pub employee_id: Uuid,
    pub employee_name: String,
}
