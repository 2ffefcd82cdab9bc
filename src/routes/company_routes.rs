use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    routing::get,
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::company_controller::CompanyController;
use crate::dto::company_dto::CompanyRequest;
use crate::dto::ApiResponse;
use crate::middleware::auth::{admin_only_middleware, auth_middleware, super_admin_only_middleware, AuthenticatedUser};
use crate::models::{analytics::CompanyStats, company::Company, user::UserRole};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::validation::ValidatedJson;

pub fn create_company_router(state: AppState) -> Router<AppState> {
    let super_admin = Router::new()
        .route("/", get(list_companies).post(create_company))
        .route_layer(middleware::from_fn(super_admin_only_middleware));

    let admin = Router::new()
        .route("/:id/stats", get(company_stats))
        .route_layer(middleware::from_fn(admin_only_middleware));

    Router::new()
        .route("/:id", get(get_company).put(update_company).delete(delete_company))
        .merge(super_admin)
        .merge(admin)
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

async fn list_companies(State(state): State<AppState>) -> Result<Json<ApiResponse<Vec<Company>>>, AppError> {
    let companies = CompanyController::new(&state).list().await?;
    Ok(Json(ApiResponse::list(companies)))
}

async fn create_company(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CompanyRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Company>>), AppError> {
    let company = CompanyController::new(&state).create(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(company, "Company created successfully")),
    ))
}

async fn get_company(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Company>>, AppError> {
    let company = CompanyController::new(&state).get(&user, id).await?;
    Ok(Json(ApiResponse::success(company)))
}

async fn company_stats(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<CompanyStats>>, AppError> {
    let stats = CompanyController::new(&state).stats(&user, id).await?;
    Ok(Json(ApiResponse::success(stats)))
}

async fn update_company(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<CompanyRequest>,
) -> Result<Json<ApiResponse<Company>>, AppError> {
    user.require_roles(&[UserRole::SuperAdmin], "update company")?;
    let company = CompanyController::new(&state).update(id, request).await?;
    Ok(Json(ApiResponse::success_with_message(company, "Company updated successfully")))
}

async fn delete_company(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    user.require_roles(&[UserRole::SuperAdmin], "delete company")?;
    CompanyController::new(&state).delete(id).await?;
    Ok(Json(ApiResponse::message("Company deleted successfully")))
}
