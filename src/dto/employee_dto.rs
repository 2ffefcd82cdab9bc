//! Employee requests and views

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::{
    document::EmployeeDocument,
    employee::{Employee, EmployeeChanges, EmployeeStatus},
    letter::GeneratedLetter,
};
use crate::utils::validation::{normalize_optional, AADHAAR_REGEX, PHONE_REGEX};

/// Optional fields supplied when converting a visitor
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ConvertVisitorRequest {
    #[validate(length(max = 100, message = "Department is too long"))]
    pub department: Option<String>,
    #[validate(length(max = 100, message = "Designation is too long"))]
    pub designation: Option<String>,
    pub date_of_joining: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateEmployeeRequest {
    #[validate(length(min = 1, max = 255, message = "Full name is required"))]
    pub full_name: String,
    #[validate(regex(path = "PHONE_REGEX", message = "Phone must be 10 digits"))]
    pub phone: String,
    #[validate(email(message = "Invalid email"))]
    pub email: Option<String>,
    #[validate(regex(path = "AADHAAR_REGEX", message = "Aadhaar number must be 12 digits"))]
    pub aadhaar_number: String,
    #[validate(length(max = 100, message = "Department is too long"))]
    pub department: Option<String>,
    #[validate(length(max = 100, message = "Designation is too long"))]
    pub designation: Option<String>,
    pub date_of_joining: Option<NaiveDate>,
    /// Only honoured for super admins.
    pub company_id: Option<Uuid>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateEmployeeRequest {
    #[validate(length(min = 1, max = 255, message = "Full name cannot be empty"))]
    pub full_name: Option<String>,
    #[validate(regex(path = "PHONE_REGEX", message = "Phone must be 10 digits"))]
    pub phone: Option<String>,
    #[validate(email(message = "Invalid email"))]
    pub email: Option<String>,
    #[validate(regex(path = "AADHAAR_REGEX", message = "Aadhaar number must be 12 digits"))]
    pub aadhaar_number: Option<String>,
    #[validate(length(max = 100, message = "Department is too long"))]
    pub department: Option<String>,
    #[validate(length(max = 100, message = "Designation is too long"))]
    pub designation: Option<String>,
    pub date_of_joining: Option<NaiveDate>,
}

impl From<UpdateEmployeeRequest> for EmployeeChanges {
    fn from(request: UpdateEmployeeRequest) -> Self {
        Self {
            full_name: normalize_optional(request.full_name),
            phone: request.phone,
            email: normalize_optional(request.email),
            aadhaar_number: request.aadhaar_number,
            department: normalize_optional(request.department),
            designation: normalize_optional(request.designation),
            date_of_joining: request.date_of_joining,
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct OffboardRequest {
    pub date_of_leaving: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct EmployeeQuery {
    pub status: Option<EmployeeStatus>,
    pub department: Option<String>,
    pub company_id: Option<Uuid>,
}

/// Result of a visitor conversion
#[derive(Debug, Serialize)]
pub struct ConversionResult {
    pub employee: Employee,
    /// Whether a login account was created for the new employee.
    pub account_created: bool,
}

/// Employee with its documents and letters
#[derive(Debug, Serialize)]
pub struct EmployeeDetail {
    #[serde(flatten)]
    pub employee: Employee,
    pub documents: Vec<EmployeeDocument>,
    pub letters: Vec<GeneratedLetter>,
}
