use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    routing::get,
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::letter_controller::LetterController;
use crate::dto::letter_dto::{CreateTemplateRequest, TemplateQuery, UpdateTemplateRequest};
use crate::dto::ApiResponse;
use crate::middleware::auth::{admin_only_middleware, auth_middleware, AuthenticatedUser};
use crate::models::letter::LetterTemplate;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::validation::ValidatedJson;

pub fn create_template_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_templates).post(create_template))
        .route("/:id", get(get_template).put(update_template).delete(delete_template))
        .route_layer(middleware::from_fn(admin_only_middleware))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

async fn list_templates(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<TemplateQuery>,
) -> Result<Json<ApiResponse<Vec<LetterTemplate>>>, AppError> {
    let templates = LetterController::new(&state)
        .list_templates(&user, query)
        .await?;
    Ok(Json(ApiResponse::list(templates)))
}

async fn create_template(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<CreateTemplateRequest>,
) -> Result<(StatusCode, Json<ApiResponse<LetterTemplate>>), AppError> {
    let template = LetterController::new(&state)
        .create_template(&user, request)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(template, "Template created successfully")),
    ))
}

async fn get_template(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<LetterTemplate>>, AppError> {
    let template = LetterController::new(&state).get_template(&user, id).await?;
    Ok(Json(ApiResponse::success(template)))
}

async fn update_template(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateTemplateRequest>,
) -> Result<Json<ApiResponse<LetterTemplate>>, AppError> {
    let template = LetterController::new(&state)
        .update_template(&user, id, request)
        .await?;
    Ok(Json(ApiResponse::success_with_message(template, "Template updated successfully")))
}

async fn delete_template(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    LetterController::new(&state).delete_template(&user, id).await?;
    Ok(Json(ApiResponse::message("Template deleted successfully")))
}
