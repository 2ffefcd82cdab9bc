use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{Datelike, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use hr_admin::{
    create_app_router,
    models::{
        company::Company,
        user::{NewUser, User, UserRole},
    },
    services::password::hash_password,
    utils::jwt::generate_token,
    AppState,
};

const PASSWORD: &str = "Password@123";

struct TestApp {
    state: AppState,
    router: Router,
    company: Company,
    admin_token: String,
}

impl TestApp {
    async fn new() -> Self {
        let state = AppState::in_memory();
        let company = state.repos.companies.create("ONS Solution").await.unwrap();
        let router = create_app_router(state.clone());

        let mut app = Self {
            state,
            router,
            company,
            admin_token: String::new(),
        };
        let admin = app.user("admin@ons.in", UserRole::AdminHr).await;
        app.admin_token = app.token(&admin);
        app
    }

    async fn user(&self, email: &str, role: UserRole) -> User {
        let password_hash = hash_password(PASSWORD, self.state.config.bcrypt_cost).await.unwrap();
        self.state
            .repos
            .users
            .create(NewUser {
                email: email.to_string(),
                password_hash,
                role,
                full_name: format!("User {}", email),
                company_id: Some(self.company.id),
                must_change_password: false,
            })
            .await
            .unwrap()
    }

    fn token(&self, user: &User) -> String {
        generate_token(user, &self.state.jwt_config()).unwrap()
    }

    async fn send(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    async fn admin(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let token = self.admin_token.clone();
        self.send(method, uri, Some(&token), body).await
    }

    async fn register(&self, aadhaar: &str, phone: &str, email: Option<&str>) -> (StatusCode, Value) {
        self.send(
            Method::POST,
            "/api/visitors/register",
            None,
            Some(json!({
                "full_name": "Ravi Kumar",
                "phone": phone,
                "email": email,
                "aadhaar_number": aadhaar,
                "company_id": self.company.id,
            })),
        )
        .await
    }

    async fn create_employee(&self, aadhaar: &str, phone: &str) -> Value {
        let (status, body) = self
            .admin(
                Method::POST,
                "/api/employees",
                Some(json!({
                    "full_name": "Asha Rao",
                    "phone": phone,
                    "aadhaar_number": aadhaar,
                    "department": "Operations",
                    "date_of_joining": "2024-01-15",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["data"].clone()
    }
}

fn id_of(value: &Value) -> String {
    value["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new().await;
    let (status, body) = app.send(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = TestApp::new().await;
    let (status, body) = app.send(Method::GET, "/api/visitors", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["error_code"], "UNAUTHORIZED");

    let (status, _) = app.send(Method::GET, "/api/employees", Some("not-a-token"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_and_profile() {
    let app = TestApp::new().await;
    app.user("hr@ons.in", UserRole::Hr).await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "HR@ons.in", "password": PASSWORD })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    let token = body["data"]["token"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["user"]["role"], "HR");

    let (status, body) = app.send(Method::GET, "/api/auth/profile", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], "hr@ons.in");

    let (status, body) = app
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "hr@ons.in", "password": "wrong-password" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error_code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_registration_validation_errors() {
    let app = TestApp::new().await;
    let (status, body) = app.register("1234", "98765", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_code"], "VALIDATION_ERROR");
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["aadhaar_number", "phone"]);
}

#[tokio::test]
async fn test_new_visitor_registration() {
    let app = TestApp::new().await;
    let (status, body) = app.register("111122223333", "9000000001", None).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["allow"], true);
    assert_eq!(body["candidate_type"], "NEW");
    assert_eq!(body["data"]["status"], "PENDING");
    assert_eq!(body["data"]["previous_employee_flag"], false);
}

#[tokio::test]
async fn test_active_employee_blocks_registration() {
    let app = TestApp::new().await;
    let employee = app.create_employee("444455556666", "9000000002").await;

    // Same phone, different aadhaar: still the same person.
    let (status, body) = app.register("999988887777", "9000000002", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["allow"], false);
    assert_eq!(body["reason"], "Already Active Employee");
    assert_eq!(body["employee_id"], employee["id"]);

    let (_, list) = app.admin(Method::GET, "/api/visitors", None).await;
    assert_eq!(list["count"], 0);
}

#[tokio::test]
async fn test_offboarded_employee_registers_as_rejoining() {
    let app = TestApp::new().await;
    let employee = app.create_employee("555566667777", "9000000003").await;
    let (status, _) = app
        .admin(
            Method::POST,
            &format!("/api/employees/{}/offboard", id_of(&employee)),
            Some(json!({ "date_of_leaving": "2024-06-30" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.register("555566667777", "9111111111", None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["candidate_type"], "REJOINING");
    assert_eq!(body["data"]["previous_employee_flag"], true);
}

#[tokio::test]
async fn test_rejected_visitor_reapplies() {
    let app = TestApp::new().await;
    let (_, first) = app.register("123456789012", "9000000004", None).await;
    let visitor_id = first["visitor_id"].as_str().unwrap().to_string();

    let (status, body) = app
        .admin(
            Method::PATCH,
            &format!("/api/visitors/{}/status", visitor_id),
            Some(json!({ "status": "REJECTED", "remarks": "Not a fit" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["status"], "REJECTED");

    let (status, body) = app.register("123456789012", "9000000004", None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["candidate_type"], "REAPPLY");
}

#[tokio::test]
async fn test_selected_visitor_cannot_go_back_to_pending() {
    let app = TestApp::new().await;
    let (_, first) = app.register("222233334444", "9000000005", None).await;
    let uri = format!("/api/visitors/{}/status", first["visitor_id"].as_str().unwrap());

    let (status, _) = app.admin(Method::PATCH, &uri, Some(json!({ "status": "SELECTED" }))).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = app.admin(Method::PATCH, &uri, Some(json!({ "status": "PENDING" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Cannot change visitor status from SELECTED to PENDING");
}

#[tokio::test]
async fn test_conversion_creates_employee_with_sequential_codes() {
    let app = TestApp::new().await;
    let year = Utc::now().year();

    let (_, first) = app.register("100000000001", "9200000001", Some("first@mail.in")).await;
    let (_, second) = app.register("100000000002", "9200000002", None).await;

    let (status, body) = app
        .admin(
            Method::POST,
            &format!("/api/employees/convert/{}", first["visitor_id"].as_str().unwrap()),
            Some(json!({ "department": "Sales", "designation": "Executive" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    let employee = &body["data"]["employee"];
    assert_eq!(employee["employee_code"], format!("ONS-{}-0001", year));
    assert_eq!(employee["status"], "ACTIVE");
    assert_eq!(employee["visitor_id"], first["visitor_id"]);
    assert_eq!(body["data"]["account_created"], true);

    let (status, body) = app
        .admin(
            Method::POST,
            &format!("/api/employees/convert/{}", second["visitor_id"].as_str().unwrap()),
            Some(json!({})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["employee"]["employee_code"], format!("ONS-{}-0002", year));
    // No email on record, no account.
    assert_eq!(body["data"]["account_created"], false);

    let (_, visitor) = app
        .admin(
            Method::GET,
            &format!("/api/visitors/{}", first["visitor_id"].as_str().unwrap()),
            None,
        )
        .await;
    assert_eq!(visitor["data"]["status"], "SELECTED");

    // The provisioned account must change its password.
    let account = app
        .state
        .repos
        .users
        .find_by_email("first@mail.in")
        .await
        .unwrap()
        .unwrap();
    assert!(account.must_change_password);
    assert_eq!(account.role, UserRole::Hr);
}

#[tokio::test]
async fn test_conversion_conflicts_with_active_employee() {
    let app = TestApp::new().await;
    let (_, visitor) = app.register("777788889999", "9300000001", None).await;
    let visitor_id = visitor["visitor_id"].as_str().unwrap().to_string();

    // Hired directly after the visitor registered.
    app.create_employee("777788889999", "9300000002").await;

    let (status, body) = app
        .admin(Method::POST, &format!("/api/employees/convert/{}", visitor_id), Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error_code"], "CONFLICT");

    let (_, employees) = app.admin(Method::GET, "/api/employees", None).await;
    assert_eq!(employees["count"], 1);
    let (_, visitor) = app.admin(Method::GET, &format!("/api/visitors/{}", visitor_id), None).await;
    assert_eq!(visitor["data"]["status"], "PENDING");
}

#[tokio::test]
async fn test_hr_only_sees_hosted_visitors() {
    let app = TestApp::new().await;
    let hr_a = app.user("a@ons.in", UserRole::Hr).await;
    let hr_b = app.user("b@ons.in", UserRole::Hr).await;
    let token_a = app.token(&hr_a);
    let token_b = app.token(&hr_b);

    let (status, body) = app
        .send(
            Method::POST,
            "/api/visitors/register",
            Some(&token_a),
            Some(json!({
                "full_name": "Meena",
                "phone": "9400000001",
                "aadhaar_number": "300000000001",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["data"]["hr_id"], hr_a.id.to_string());
    let visitor_id = body["visitor_id"].as_str().unwrap().to_string();

    let (_, list_a) = app.send(Method::GET, "/api/visitors", Some(&token_a), None).await;
    assert_eq!(list_a["count"], 1);
    let (_, list_b) = app.send(Method::GET, "/api/visitors", Some(&token_b), None).await;
    assert_eq!(list_b["count"], 0);

    let (status, _) = app
        .send(Method::GET, &format!("/api/visitors/{}", visitor_id), Some(&token_b), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Admins see the whole company.
    let (_, all) = app.admin(Method::GET, "/api/visitors", None).await;
    assert_eq!(all["count"], 1);
}

#[tokio::test]
async fn test_template_versions_and_letter_generation() {
    let app = TestApp::new().await;
    let employee = app.create_employee("600000000001", "9500000001").await;

    let (status, v1) = app
        .admin(
            Method::POST,
            "/api/templates",
            Some(json!({ "type": "OFFER", "name": "Offer", "content": "Dear {{full_name}}" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", v1);
    assert_eq!(v1["data"]["version"], 1);

    let (_, v2) = app
        .admin(
            Method::POST,
            "/api/templates",
            Some(json!({
                "type": "OFFER",
                "name": "Offer",
                "content": "Dear {{ full_name }} ({{employee_code}}), CTC {{salary}}. {{unknown}}",
            })),
        )
        .await;
    assert_eq!(v2["data"]["version"], 2);
    assert_eq!(v2["data"]["is_active"], true);

    let (_, active) = app
        .admin(Method::GET, "/api/templates?type=OFFER&is_active=true", None)
        .await;
    assert_eq!(active["count"], 1);
    assert_eq!(active["data"][0]["id"], v2["data"]["id"]);

    let (status, letter) = app
        .admin(
            Method::POST,
            &format!("/api/employees/{}/generate-letter", id_of(&employee)),
            Some(json!({ "type": "OFFER", "additional_data": { "{{salary}}": "5 LPA" } })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", letter);
    let content = letter["data"]["generated_content"].as_str().unwrap();
    assert!(content.starts_with("Dear Asha Rao ("));
    assert!(content.contains("CTC 5 LPA."));
    assert!(content.ends_with("{{unknown}}"));
    assert!(letter["data"]["file_url"].as_str().unwrap().starts_with("/files/"));

    let (_, letters) = app
        .admin(Method::GET, &format!("/api/employees/{}/letters", id_of(&employee)), None)
        .await;
    assert_eq!(letters["count"], 1);
}

#[tokio::test]
async fn test_templates_are_admin_only() {
    let app = TestApp::new().await;
    let hr = app.user("hr@ons.in", UserRole::Hr).await;
    let token = app.token(&hr);

    let (status, body) = app.send(Method::GET, "/api/templates", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error_code"], "FORBIDDEN");
}

#[tokio::test]
async fn test_document_upload_and_delete() {
    let app = TestApp::new().await;
    let employee = app.create_employee("700000000001", "9600000001").await;
    let uri = format!("/api/employees/{}/documents", id_of(&employee));

    let (status, body) = app
        .admin(
            Method::POST,
            &uri,
            Some(json!({
                "document_type": "AADHAAR",
                "file_name": "aadhaar.pdf",
                "content_type": "application/pdf",
                "file_data": "JVBERi0xLjQK",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    let document_id = id_of(&body["data"]);
    assert!(body["data"]["file_url"].as_str().unwrap().ends_with(".pdf"));

    let (status, body) = app
        .admin(
            Method::POST,
            &uri,
            Some(json!({ "document_type": "PAN", "file_name": "pan.pdf", "file_data": "%%%" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_code"], "BAD_REQUEST");

    let (status, _) = app
        .admin(Method::DELETE, &format!("{}/{}", uri, document_id), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let (_, list) = app.admin(Method::GET, &uri, None).await;
    assert_eq!(list["count"], 0);
}

#[tokio::test]
async fn test_employee_stats_and_report() {
    let app = TestApp::new().await;
    app.create_employee("800000000001", "9700000001").await;
    let leaving = app.create_employee("800000000002", "9700000002").await;
    app.admin(
        Method::POST,
        &format!("/api/employees/{}/offboard", id_of(&leaving)),
        Some(json!({})),
    )
    .await;

    let (status, stats) = app.admin(Method::GET, "/api/employees/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["data"]["total"], 2);
    assert_eq!(stats["data"]["active"], 1);
    assert_eq!(stats["data"]["active_percentage"], 50.0);

    let (status, report) = app.admin(Method::GET, "/api/reports/analytics", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["data"]["stats"]["totalEmployees"], 2);
    assert_eq!(report["data"]["hiringTrend"].as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn test_companies_are_super_admin_only() {
    let app = TestApp::new().await;
    let (status, _) = app.admin(Method::GET, "/api/companies", None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // ADMIN_HR can read its own company's stats but not another's.
    let (status, body) = app
        .admin(Method::GET, &format!("/api/companies/{}/stats", app.company.id), None)
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["users"]["by_role"]["admin_hr"], 1);

    let (status, _) = app
        .admin(Method::GET, &format!("/api/companies/{}/stats", Uuid::new_v4()), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_cannot_deactivate_self() {
    let app = TestApp::new().await;
    let admin = app
        .state
        .repos
        .users
        .find_by_email("admin@ons.in")
        .await
        .unwrap()
        .unwrap();

    let (status, _) = app
        .admin(Method::POST, &format!("/api/auth/users/{}/deactivate", admin.id), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let hr = app.user("hr@ons.in", UserRole::Hr).await;
    let (status, body) = app
        .admin(Method::POST, &format!("/api/auth/users/{}/deactivate", hr.id), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["is_active"], false);

    // Deactivated users lose access immediately.
    let token = app.token(&hr);
    let (status, _) = app.send(Method::GET, "/api/auth/profile", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_single_letter_name_rejected() {
    let app = TestApp::new().await;
    let (status, body) = app
        .send(
            Method::POST,
            "/api/visitors/register",
            None,
            Some(json!({
                "full_name": "R",
                "phone": "9800000001",
                "aadhaar_number": "900000000001",
                "company_id": app.company.id,
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "full_name");
}

#[tokio::test]
async fn test_conversion_succeeds_when_email_already_registered() {
    let app = TestApp::new().await;
    app.user("taken@mail.in", UserRole::Hr).await;
    let (_, visitor) = app.register("100000000003", "9200000003", Some("taken@mail.in")).await;
    let visitor_id = visitor["visitor_id"].as_str().unwrap().to_string();

    let (status, body) = app
        .admin(Method::POST, &format!("/api/employees/convert/{}", visitor_id), Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["data"]["account_created"], false);
    assert_eq!(body["data"]["employee"]["status"], "ACTIVE");

    let (_, visitor) = app.admin(Method::GET, &format!("/api/visitors/{}", visitor_id), None).await;
    assert_eq!(visitor["data"]["status"], "SELECTED");
}

#[tokio::test]
async fn test_previous_employee_flag_follows_conversion() {
    let app = TestApp::new().await;
    let (_, visitor) = app.register("100000000004", "9200000004", None).await;
    let visitor_id = visitor["visitor_id"].as_str().unwrap().to_string();
    let uri = format!("/api/visitors/{}", visitor_id);

    let (_, before) = app.admin(Method::GET, &uri, None).await;
    assert_eq!(before["data"]["previous_employee_flag"], false);
    assert_eq!(before["data"]["previous_employee"], Value::Null);

    let (status, converted) = app
        .admin(Method::POST, &format!("/api/employees/convert/{}", visitor_id), Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, after) = app.admin(Method::GET, &uri, None).await;
    assert_eq!(after["data"]["previous_employee_flag"], true);
    assert_eq!(
        after["data"]["previous_employee"]["employee_code"],
        converted["data"]["employee"]["employee_code"]
    );
    assert_eq!(after["data"]["previous_employee"]["status"], "ACTIVE");

    let (_, list) = app.admin(Method::GET, "/api/visitors", None).await;
    assert_eq!(list["data"][0]["previous_employee_flag"], true);
    let (_, today) = app.admin(Method::GET, "/api/visitors/today", None).await;
    assert_eq!(today["data"][0]["previous_employee_flag"], true);
}

#[tokio::test]
async fn test_active_template_cannot_be_left_without_replacement() {
    let app = TestApp::new().await;
    let create = |content: &'static str| {
        json!({ "type": "OFFER", "name": "Offer", "content": content })
    };
    let (_, v1) = app.admin(Method::POST, "/api/templates", Some(create("v1"))).await;
    let (_, v2) = app.admin(Method::POST, "/api/templates", Some(create("v2"))).await;
    let v1_uri = format!("/api/templates/{}", id_of(&v1["data"]));
    let v2_uri = format!("/api/templates/{}", id_of(&v2["data"]));

    let (status, _) = app.admin(Method::PUT, &v2_uri, Some(json!({ "is_active": false }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = app.admin(Method::DELETE, &v2_uri, None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Switching the active version is the way out.
    let (status, body) = app.admin(Method::PUT, &v1_uri, Some(json!({ "is_active": true }))).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    let (status, _) = app.admin(Method::DELETE, &v2_uri, None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, active) = app
        .admin(Method::GET, "/api/templates?type=OFFER&is_active=true", None)
        .await;
    assert_eq!(active["count"], 1);
    assert_eq!(active["data"][0]["id"], v1["data"]["id"]);

    // The last remaining version may go.
    let (status, _) = app.admin(Method::DELETE, &v1_uri, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_multi_megabyte_document_upload() {
    use base64::{engine::general_purpose::STANDARD, Engine as _};

    let app = TestApp::new().await;
    let employee = app.create_employee("700000000002", "9600000002").await;
    let file = vec![0x25u8; 3 * 1024 * 1024];

    let (status, body) = app
        .admin(
            Method::POST,
            &format!("/api/employees/{}/documents", id_of(&employee)),
            Some(json!({
                "document_type": "PAN",
                "file_name": "scan.pdf",
                "content_type": "application/pdf",
                "file_data": STANDARD.encode(&file),
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert!(body["data"]["file_url"].as_str().unwrap().ends_with(".pdf"));
}
