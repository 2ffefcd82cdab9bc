//! Dashboard aggregations
//!
//! Pure functions over rows already scoped to one company (or all of them
//! for super admins).

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Datelike, NaiveDate, Utc};

use crate::models::{
    analytics::{
        AnalyticsReport, CompanyEmployeeCounts, CompanyStats, CompanyUserCounts,
        CompanyVisitorCounts, DepartmentHeadcount, EmployeeStats, MonthlyHires, ReportSummary,
        RoleCounts, VisitorStats,
    },
    employee::{Employee, EmployeeStatus},
    user::{User, UserRole},
    visitor::{Visitor, VisitorStatus},
};

/// Department label for employees without one.
pub const DEFAULT_DEPARTMENT: &str = "General";

const MONTHS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

/// `part / total` in percent, one decimal; zero when `total` is zero.
pub fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (part as f64 * 1000.0 / total as f64).round() / 10.0
}

fn rounded_percentage(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (part as f64 * 100.0 / total as f64).round() as u32
}

fn department_of(employee: &Employee) -> &str {
    employee
        .department
        .as_deref()
        .filter(|d| !d.trim().is_empty())
        .unwrap_or(DEFAULT_DEPARTMENT)
}

/// Visitor counters; `today` counts visitors created on or after `day_start`.
pub fn visitor_stats(visitors: &[Visitor], day_start: DateTime<Utc>) -> VisitorStats {
    let mut stats = VisitorStats {
        total: visitors.len(),
        ..Default::default()
    };
    for v in visitors {
        if v.created_at >= day_start {
            stats.today += 1;
        }
        match v.status {
            VisitorStatus::Pending => stats.pending += 1,
            VisitorStatus::Selected => stats.selected += 1,
            VisitorStatus::Rejected => stats.rejected += 1,
            VisitorStatus::Blocked => stats.blocked += 1,
        }
    }
    stats
}

pub fn employee_stats(employees: &[Employee]) -> EmployeeStats {
    let active = employees
        .iter()
        .filter(|e| e.status == EmployeeStatus::Active)
        .count();

    let mut by_department = BTreeMap::new();
    for e in employees {
        *by_department.entry(department_of(e).to_string()).or_insert(0) += 1;
    }

    EmployeeStats {
        total: employees.len(),
        active,
        offboarded: employees.len() - active,
        active_percentage: percentage(active, employees.len()),
        by_department,
    }
}

pub fn company_stats(employees: &[Employee], visitors: &[Visitor], users: &[User]) -> CompanyStats {
    let employee_stats = employee_stats(employees);
    let visitor_stats = visitor_stats(visitors, DateTime::<Utc>::MAX_UTC);

    CompanyStats {
        employees: CompanyEmployeeCounts {
            total: employee_stats.total,
            active: employee_stats.active,
            offboarded: employee_stats.offboarded,
        },
        visitors: CompanyVisitorCounts {
            total: visitor_stats.total,
            pending: visitor_stats.pending,
            selected: visitor_stats.selected,
            rejected: visitor_stats.rejected,
            blocked: visitor_stats.blocked,
        },
        users: CompanyUserCounts {
            total: users.len(),
            active: users.iter().filter(|u| u.is_active).count(),
            by_role: RoleCounts {
                admin_hr: users.iter().filter(|u| u.role == UserRole::AdminHr).count(),
                hr: users.iter().filter(|u| u.role == UserRole::Hr).count(),
            },
        },
    }
}

/// First day of the month `back` months before `today`'s month.
fn month_start(today: NaiveDate, back: u32) -> (i32, u32) {
    let index = today.year() * 12 + today.month0() as i32 - back as i32;
    (index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
}

/// Hires per month for the `months` months ending with `today`'s month, oldest first.
pub fn hiring_trend(employees: &[Employee], today: NaiveDate, months: u32) -> Vec<MonthlyHires> {
    let mut counts: HashMap<(i32, u32), usize> = HashMap::new();
    for e in employees {
        let key = (e.date_of_joining.year(), e.date_of_joining.month());
        *counts.entry(key).or_insert(0) += 1;
    }

    (0..months)
        .rev()
        .map(|back| {
            let (year, month) = month_start(today, back);
            MonthlyHires {
                month: MONTHS[(month - 1) as usize].to_string(),
                year,
                hires: counts.get(&(year, month)).copied().unwrap_or(0),
            }
        })
        .collect()
}

/// Largest departments by headcount, ties broken by name.
pub fn top_departments(employees: &[Employee], limit: usize) -> Vec<DepartmentHeadcount> {
    let stats = employee_stats(employees);
    let mut departments: Vec<(String, usize)> = stats.by_department.into_iter().collect();
    departments.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    departments
        .into_iter()
        .take(limit)
        .map(|(name, count)| DepartmentHeadcount {
            efficiency: if count > 5 { "high" } else { "active" }.to_string(),
            percentage: percentage(count, employees.len()),
            name,
            count,
        })
        .collect()
}

pub fn analytics_report(employees: &[Employee], visitors: &[Visitor], today: NaiveDate) -> AnalyticsReport {
    let employee_stats = employee_stats(employees);
    let selected = visitors
        .iter()
        .filter(|v| v.status == VisitorStatus::Selected)
        .count();
    let conversion = rounded_percentage(selected, visitors.len());

    AnalyticsReport {
        stats: ReportSummary {
            total_employees: employee_stats.total,
            active_employees: employee_stats.active,
            total_visitors: visitors.len(),
            selected_candidates: selected,
            retention_rate: employee_stats.active_percentage,
            conversion_rate: conversion,
        },
        hiring_trend: hiring_trend(employees, today, 6),
        top_departments: top_departments(employees, 5),
        visitor_conversion: conversion,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use uuid::Uuid;

    use crate::models::visitor::CandidateType;

    fn employee(department: Option<&str>, status: EmployeeStatus, joined: (i32, u32, u32)) -> Employee {
        Employee {
            id: Uuid::new_v4(),
            company_id: Uuid::nil(),
            employee_code: "ACM-2025-0001".to_string(),
            visitor_id: None,
            full_name: "E".to_string(),
            phone: "9876543210".to_string(),
            email: None,
            aadhaar_number: "123456789012".to_string(),
            department: department.map(str::to_string),
            designation: None,
            status,
            date_of_joining: NaiveDate::from_ymd_opt(joined.0, joined.1, joined.2).unwrap(),
            date_of_leaving: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn visitor(status: VisitorStatus, created_at: DateTime<Utc>) -> Visitor {
        Visitor {
            id: Uuid::new_v4(),
            company_id: Uuid::nil(),
            hr_id: None,
            full_name: "V".to_string(),
            phone: "9876543210".to_string(),
            email: None,
            aadhaar_number: "123456789012".to_string(),
            address: None,
            candidate_type: CandidateType::New,
            status,
            remarks: None,
            created_at,
            updated_at: created_at,
        }
    }

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(0, 0), 0.0);
        assert_eq!(percentage(2, 3), 66.7);
        assert_eq!(percentage(3, 3), 100.0);
    }

    #[test]
    fn test_visitor_stats_counts_today_and_statuses() {
        let day_start = Utc.with_ymd_and_hms(2025, 7, 9, 0, 0, 0).unwrap();
        let visitors = vec![
            visitor(VisitorStatus::Pending, day_start + Duration::hours(3)),
            visitor(VisitorStatus::Selected, day_start - Duration::hours(1)),
            visitor(VisitorStatus::Rejected, day_start),
            visitor(VisitorStatus::Blocked, day_start - Duration::days(3)),
        ];
        let stats = visitor_stats(&visitors, day_start);
        assert_eq!(
            stats,
            VisitorStats { total: 4, today: 2, pending: 1, selected: 1, rejected: 1, blocked: 1 }
        );
    }

    #[test]
    fn test_employee_stats_groups_departments() {
        let employees = vec![
            employee(Some("Sales"), EmployeeStatus::Active, (2025, 1, 1)),
            employee(Some("Sales"), EmployeeStatus::Offboarded, (2024, 5, 1)),
            employee(None, EmployeeStatus::Active, (2025, 2, 1)),
        ];
        let stats = employee_stats(&employees);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.active, 2);
        assert_eq!(stats.offboarded, 1);
        assert_eq!(stats.active_percentage, 66.7);
        assert_eq!(stats.by_department.get("Sales"), Some(&2));
        assert_eq!(stats.by_department.get(DEFAULT_DEPARTMENT), Some(&1));
    }

    #[test]
    fn test_hiring_trend_spans_year_boundary() {
        let employees = vec![
            employee(None, EmployeeStatus::Active, (2024, 11, 20)),
            employee(None, EmployeeStatus::Active, (2025, 2, 3)),
            employee(None, EmployeeStatus::Active, (2025, 2, 17)),
            employee(None, EmployeeStatus::Active, (2023, 2, 17)),
        ];
        let trend = hiring_trend(&employees, NaiveDate::from_ymd_opt(2025, 2, 28).unwrap(), 6);
        let labels: Vec<(&str, i32, usize)> = trend
            .iter()
            .map(|m| (m.month.as_str(), m.year, m.hires))
            .collect();
        assert_eq!(
            labels,
            vec![
                ("SEP", 2024, 0),
                ("OCT", 2024, 0),
                ("NOV", 2024, 1),
                ("DEC", 2024, 0),
                ("JAN", 2025, 0),
                ("FEB", 2025, 2),
            ]
        );
    }

    #[test]
    fn test_top_departments_orders_and_labels() {
        let mut employees: Vec<Employee> = (0..6)
            .map(|_| employee(Some("Ops"), EmployeeStatus::Active, (2025, 1, 1)))
            .collect();
        employees.push(employee(Some("HR"), EmployeeStatus::Active, (2025, 1, 1)));
        employees.push(employee(Some("Finance"), EmployeeStatus::Active, (2025, 1, 1)));

        let top = top_departments(&employees, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].name, "Ops");
        assert_eq!(top[0].efficiency, "high");
        assert_eq!(top[0].percentage, 75.0);
        assert_eq!(top[1].name, "Finance");
        assert_eq!(top[1].efficiency, "active");
    }

    #[test]
    fn test_analytics_report_rates() {
        let employees = vec![
            employee(None, EmployeeStatus::Active, (2025, 1, 1)),
            employee(None, EmployeeStatus::Offboarded, (2025, 1, 1)),
        ];
        let now = Utc::now();
        let visitors = vec![
            visitor(VisitorStatus::Selected, now),
            visitor(VisitorStatus::Pending, now),
            visitor(VisitorStatus::Rejected, now),
        ];
        let report = analytics_report(&employees, &visitors, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        assert_eq!(report.stats.retention_rate, 50.0);
        assert_eq!(report.stats.conversion_rate, 33);
        assert_eq!(report.visitor_conversion, 33);
        assert_eq!(report.stats.selected_candidates, 1);
        assert_eq!(report.hiring_trend.len(), 6);

        let body = serde_json::to_value(&report).unwrap();
        assert!(body["stats"]["totalEmployees"].is_number());
        assert!(body["hiringTrend"].is_array());
    }
}
