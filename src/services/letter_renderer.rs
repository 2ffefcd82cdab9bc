//! Letter rendering
//!
//! Substitutes `{{token}}` placeholders with employee data and caller
//! overrides, then wraps the result in a printable HTML page.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::models::employee::Employee;

lazy_static! {
    static ref TOKEN_REGEX: Regex = Regex::new(r"\{\{\s*([A-Za-z0-9_]+)\s*\}\}").unwrap();
}

/// `d/m/yyyy`, the way Indian letters print dates.
pub fn format_letter_date(date: NaiveDate) -> String {
    format!("{}/{}/{}", date.day(), date.month(), date.year())
}

/// Token values for an employee. Missing optional fields render empty.
pub fn employee_tokens(employee: &Employee, company_name: &str, today: NaiveDate) -> HashMap<String, String> {
    let mut tokens = HashMap::new();
    tokens.insert("full_name".to_string(), employee.full_name.clone());
    tokens.insert("employee_code".to_string(), employee.employee_code.clone());
    tokens.insert("designation".to_string(), employee.designation.clone().unwrap_or_default());
    tokens.insert("department".to_string(), employee.department.clone().unwrap_or_default());
    tokens.insert("date_of_joining".to_string(), employee.date_of_joining.to_string());
    tokens.insert(
        "date_of_leaving".to_string(),
        employee.date_of_leaving.map(|d| d.to_string()).unwrap_or_default(),
    );
    tokens.insert("email".to_string(), employee.email.clone().unwrap_or_default());
    tokens.insert("phone".to_string(), employee.phone.clone());
    tokens.insert("company_name".to_string(), company_name.to_string());
    tokens.insert("current_date".to_string(), format_letter_date(today));
    tokens
}

/// Strip optional `{{ }}` around an override key.
fn override_key(key: &str) -> &str {
    key.trim()
        .trim_start_matches("{{")
        .trim_end_matches("}}")
        .trim()
}

fn override_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Merge caller overrides into the token map; overrides win.
pub fn apply_overrides(tokens: &mut HashMap<String, String>, overrides: &HashMap<String, serde_json::Value>) {
    for (key, value) in overrides {
        let key = override_key(key);
        if !key.is_empty() {
            tokens.insert(key.to_string(), override_value(value));
        }
    }
}

/// Replace every known placeholder; unknown ones are left as written.
pub fn render(content: &str, tokens: &HashMap<String, String>) -> String {
    TOKEN_REGEX
        .replace_all(content, |caps: &Captures| {
            tokens
                .get(&caps[1])
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Printable page around the rendered letter body.
pub fn wrap_html(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="UTF-8">
  <title>{title}</title>
  <style>
    body {{ font-family: Arial, sans-serif; margin: 40px; }}
    .content {{ line-height: 1.6; }}
  </style>
</head>
<body>
  <div class="content">
{body}
  </div>
</body>
</html>
"#,
        title = title,
        body = body
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    use crate::models::employee::EmployeeStatus;

    fn employee() -> Employee {
        Employee {
            id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            employee_code: "ONS-2025-0001".to_string(),
            visitor_id: None,
            full_name: "Asha Rao".to_string(),
            phone: "9876543210".to_string(),
            email: None,
            aadhaar_number: "123456789012".to_string(),
            department: Some("Operations".to_string()),
            designation: None,
            status: EmployeeStatus::Active,
            date_of_joining: NaiveDate::from_ymd_opt(2025, 3, 4).unwrap(),
            date_of_leaving: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 9).unwrap()
    }

    #[test]
    fn test_renders_employee_tokens() {
        let tokens = employee_tokens(&employee(), "ONS Solution", today());
        let out = render(
            "Dear {{full_name}} ({{employee_code}}), you join {{department}} at {{company_name}} on {{date_of_joining}}. Dated {{current_date}}.",
            &tokens,
        );
        assert_eq!(
            out,
            "Dear Asha Rao (ONS-2025-0001), you join Operations at ONS Solution on 2025-03-04. Dated 9/7/2025."
        );
    }

    #[test]
    fn test_missing_fields_render_empty_and_unknown_tokens_stay() {
        let tokens = employee_tokens(&employee(), "ONS", today());
        let out = render("[{{designation}}] {{salary}} {{ email }}", &tokens);
        assert_eq!(out, "[] {{salary}} ");
    }

    #[test]
    fn test_overrides_win_and_accept_braced_keys() {
        let mut tokens = employee_tokens(&employee(), "ONS", today());
        let mut overrides = HashMap::new();
        overrides.insert("{{full_name}}".to_string(), serde_json::json!("Ms. Asha Rao"));
        overrides.insert("salary".to_string(), serde_json::json!(45000));
        apply_overrides(&mut tokens, &overrides);

        let out = render("{{full_name}} earns {{salary}}", &tokens);
        assert_eq!(out, "Ms. Asha Rao earns 45000");
    }

    #[test]
    fn test_wrap_html_contains_body() {
        let page = wrap_html("OFFER", "<p>Hello</p>");
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<title>OFFER</title>"));
        assert!(page.contains("<p>Hello</p>"));
    }
}
