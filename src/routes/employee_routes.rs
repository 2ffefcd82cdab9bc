use axum::{
    extract::{DefaultBodyLimit, Path, Query, State},
    http::StatusCode,
    middleware,
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::document_controller::{DocumentController, MAX_UPLOAD_BODY_BYTES};
use crate::controllers::employee_controller::EmployeeController;
use crate::controllers::letter_controller::LetterController;
use crate::dto::company_dto::CompanyScopeQuery;
use crate::dto::document_dto::UploadDocumentRequest;
use crate::dto::employee_dto::{
    ConversionResult, ConvertVisitorRequest, CreateEmployeeRequest, EmployeeDetail, EmployeeQuery, OffboardRequest,
    UpdateEmployeeRequest,
};
use crate::dto::letter_dto::GenerateLetterRequest;
use crate::dto::ApiResponse;
use crate::middleware::auth::{auth_middleware, AuthenticatedUser};
use crate::models::{
    analytics::EmployeeStats,
    document::EmployeeDocument,
    employee::Employee,
    letter::GeneratedLetter,
    user::UserRole,
};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::validation::ValidatedJson;

pub fn create_employee_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_employees).post(create_employee))
        .route("/stats", get(employee_stats))
        .route("/convert/:id", post(convert_visitor))
        .route("/:id", get(get_employee).put(update_employee).delete(delete_employee))
        .route("/:id/offboard", post(offboard_employee))
        .route(
            "/:id/documents",
            get(list_documents)
                .post(upload_document)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BODY_BYTES)),
        )
        .route("/:id/documents/:document_id", get(get_document).delete(delete_document))
        .route("/:id/generate-letter", post(generate_letter))
        .route("/:id/letters", get(list_letters))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

async fn convert_visitor(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(visitor_id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<ConvertVisitorRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ConversionResult>>), AppError> {
    let result = EmployeeController::new(&state)
        .convert(&user, visitor_id, request)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(result, "Visitor converted to employee")),
    ))
}

async fn create_employee(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<CreateEmployeeRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Employee>>), AppError> {
    let employee = EmployeeController::new(&state).create(&user, request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(employee, "Employee created successfully")),
    ))
}

async fn list_employees(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<EmployeeQuery>,
) -> Result<Json<ApiResponse<Vec<Employee>>>, AppError> {
    let employees = EmployeeController::new(&state).list(&user, query).await?;
    Ok(Json(ApiResponse::list(employees)))
}

async fn employee_stats(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<CompanyScopeQuery>,
) -> Result<Json<ApiResponse<EmployeeStats>>, AppError> {
    let stats = EmployeeController::new(&state)
        .stats(&user, query.company_id)
        .await?;
    Ok(Json(ApiResponse::success(stats)))
}

async fn get_employee(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<EmployeeDetail>>, AppError> {
    let employee = EmployeeController::new(&state).get(&user, id).await?;
    Ok(Json(ApiResponse::success(employee)))
}

async fn update_employee(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateEmployeeRequest>,
) -> Result<Json<ApiResponse<Employee>>, AppError> {
    let employee = EmployeeController::new(&state)
        .update(&user, id, request)
        .await?;
    Ok(Json(ApiResponse::success_with_message(employee, "Employee updated successfully")))
}

async fn offboard_employee(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<OffboardRequest>,
) -> Result<Json<ApiResponse<Employee>>, AppError> {
    let employee = EmployeeController::new(&state)
        .offboard(&user, id, request)
        .await?;
    Ok(Json(ApiResponse::success_with_message(employee, "Employee offboarded")))
}

async fn delete_employee(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    user.require_roles(&[UserRole::SuperAdmin, UserRole::AdminHr], "delete employee")?;
    EmployeeController::new(&state).delete(&user, id).await?;
    Ok(Json(ApiResponse::message("Employee deleted successfully")))
}

async fn upload_document(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UploadDocumentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<EmployeeDocument>>), AppError> {
    let document = DocumentController::new(&state)
        .upload(&user, id, request)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(document, "Document uploaded successfully")),
    ))
}

async fn list_documents(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<EmployeeDocument>>>, AppError> {
    let documents = DocumentController::new(&state).list(&user, id).await?;
    Ok(Json(ApiResponse::list(documents)))
}

async fn get_document(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path((id, document_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ApiResponse<EmployeeDocument>>, AppError> {
    let document = DocumentController::new(&state)
        .get(&user, id, document_id)
        .await?;
    Ok(Json(ApiResponse::success(document)))
}

async fn delete_document(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path((id, document_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    DocumentController::new(&state)
        .delete(&user, id, document_id)
        .await?;
    Ok(Json(ApiResponse::message("Document deleted successfully")))
}

async fn generate_letter(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<GenerateLetterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<GeneratedLetter>>), AppError> {
    let letter = LetterController::new(&state)
        .generate(&user, id, request)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(letter, "Letter generated successfully")),
    ))
}

async fn list_letters(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<GeneratedLetter>>>, AppError> {
    let letters = LetterController::new(&state).list_letters(&user, id).await?;
    Ok(Json(ApiResponse::list(letters)))
}
