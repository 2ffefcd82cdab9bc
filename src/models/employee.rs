//! Employee model
//!
//! Employees are created directly or by converting a visitor. Only one ACTIVE
//! employee may exist per (company, aadhaar_number).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Employment status - maps to the `employee_status` enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "employee_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmployeeStatus {
    Active,
    Offboarded,
}

/// Employee row
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Employee {
    pub id: Uuid,
    pub company_id: Uuid,
    pub employee_code: String,
    pub visitor_id: Option<Uuid>,
    pub full_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub aadhaar_number: String,
    pub department: Option<String>,
    pub designation: Option<String>,
    pub status: EmployeeStatus,
    pub date_of_joining: NaiveDate,
    pub date_of_leaving: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Values for inserting an ACTIVE employee
#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub company_id: Uuid,
    pub employee_code: String,
    pub visitor_id: Option<Uuid>,
    pub full_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub aadhaar_number: String,
    pub department: Option<String>,
    pub designation: Option<String>,
    pub date_of_joining: NaiveDate,
}

/// Employee record matched to a visitor by aadhaar
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PreviousEmployee {
    pub id: Uuid,
    pub employee_code: String,
    pub full_name: String,
    pub status: EmployeeStatus,
}

impl From<&Employee> for PreviousEmployee {
    fn from(employee: &Employee) -> Self {
        Self {
            id: employee.id,
            employee_code: employee.employee_code.clone(),
            full_name: employee.full_name.clone(),
            status: employee.status,
        }
    }
}

/// Partial update; `None` keeps the current value
#[derive(Debug, Clone, Default)]
pub struct EmployeeChanges {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub aadhaar_number: Option<String>,
    pub department: Option<String>,
    pub designation: Option<String>,
    pub date_of_joining: Option<NaiveDate>,
}

impl EmployeeChanges {
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none()
            && self.phone.is_none()
            && self.email.is_none()
            && self.aadhaar_number.is_none()
            && self.department.is_none()
            && self.designation.is_none()
            && self.date_of_joining.is_none()
    }

    /// Apply onto an in-memory row.
    pub fn apply_to(self, employee: &mut Employee) {
        if let Some(v) = self.full_name {
            employee.full_name = v;
        }
        if let Some(v) = self.phone {
            employee.phone = v;
        }
        if let Some(v) = self.email {
            employee.email = Some(v);
        }
        if let Some(v) = self.aadhaar_number {
            employee.aadhaar_number = v;
        }
        if let Some(v) = self.department {
            employee.department = Some(v);
        }
        if let Some(v) = self.designation {
            employee.designation = Some(v);
        }
        if let Some(v) = self.date_of_joining {
            employee.date_of_joining = v;
        }
    }
}

/// Listing filters
#[derive(Debug, Clone, Default)]
pub struct EmployeeFilter {
    pub company_id: Option<Uuid>,
    pub status: Option<EmployeeStatus>,
    pub department: Option<String>,
}

impl EmployeeFilter {
    pub fn matches(&self, employee: &Employee) -> bool {
        self.company_id.map_or(true, |c| employee.company_id == c)
            && self.status.map_or(true, |s| employee.status == s)
            && self
                .department
                .as_deref()
                .map_or(true, |d| employee.department.as_deref() == Some(d))
    }
}
