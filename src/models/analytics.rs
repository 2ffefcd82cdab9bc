//! Dashboard statistics and report payloads

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Visitor counters for the dashboard
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct VisitorStats {
    pub total: usize,
    pub today: usize,
    pub pending: usize,
    pub selected: usize,
    pub rejected: usize,
    pub blocked: usize,
}

/// Employee counters for the dashboard
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EmployeeStats {
    pub total: usize,
    pub active: usize,
    pub offboarded: usize,
    /// Share of ACTIVE employees in percent, one decimal.
    pub active_percentage: f64,
    pub by_department: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CompanyEmployeeCounts {
    pub total: usize,
    pub active: usize,
    pub offboarded: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CompanyVisitorCounts {
    pub total: usize,
    pub pending: usize,
    pub selected: usize,
    pub rejected: usize,
    pub blocked: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RoleCounts {
    pub admin_hr: usize,
    pub hr: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CompanyUserCounts {
    pub total: usize,
    pub active: usize,
    pub by_role: RoleCounts,
}

/// Per-company overview for super admins
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CompanyStats {
    pub employees: CompanyEmployeeCounts,
    pub visitors: CompanyVisitorCounts,
    pub users: CompanyUserCounts,
}

/// Headline numbers of the analytics report
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub total_employees: usize,
    pub active_employees: usize,
    pub total_visitors: usize,
    pub selected_candidates: usize,
    /// ACTIVE / total employees, percent with one decimal.
    pub retention_rate: f64,
    /// SELECTED / total visitors, rounded percent.
    pub conversion_rate: u32,
}

/// Hires per month
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthlyHires {
    pub month: String,
    pub year: i32,
    pub hires: usize,
}

/// Headcount per department
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DepartmentHeadcount {
    pub name: String,
    pub count: usize,
    pub percentage: f64,
    pub efficiency: String,
}

/// `GET /reports/analytics`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub stats: ReportSummary,
    pub hiring_trend: Vec<MonthlyHires>,
    pub top_departments: Vec<DepartmentHeadcount>,
    pub visitor_conversion: u32,
}
