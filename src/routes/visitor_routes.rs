use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::visitor_controller::{RegistrationOutcome, VisitorController};
use crate::dto::company_dto::CompanyScopeQuery;
use crate::dto::visitor_dto::{RegisterVisitorRequest, UpdateVisitorStatusRequest, VisitorQuery, VisitorView};
use crate::dto::ApiResponse;
use crate::middleware::auth::{auth_middleware, optional_auth_middleware, AuthenticatedUser};
use crate::models::{analytics::VisitorStats, user::HostSummary, visitor::Visitor};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::validation::ValidatedJson;

pub fn create_visitor_router(state: AppState) -> Router<AppState> {
    // Kiosk endpoints: a token is used when present.
    let public = Router::new()
        .route("/public/hosts", get(list_hosts))
        .route("/register", post(register_visitor))
        .route_layer(middleware::from_fn_with_state(state.clone(), optional_auth_middleware));

    let protected = Router::new()
        .route("/", get(list_visitors))
        .route("/stats", get(visitor_stats))
        .route("/today", get(today_visitors))
        .route("/:id", get(get_visitor).delete(delete_visitor))
        .route("/:id/status", patch(update_status))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    public.merge(protected)
}

async fn list_hosts(
    State(state): State<AppState>,
    user: Option<Extension<AuthenticatedUser>>,
    Query(query): Query<CompanyScopeQuery>,
) -> Result<Json<ApiResponse<Vec<HostSummary>>>, AppError> {
    let caller = user.as_ref().map(|Extension(u)| u);
    let hosts = VisitorController::new(&state)
        .list_hosts(caller, query.company_id)
        .await?;
    Ok(Json(ApiResponse::list(hosts)))
}

/// 201 with the classification, or 409 when the person is an active employee.
async fn register_visitor(
    State(state): State<AppState>,
    user: Option<Extension<AuthenticatedUser>>,
    ValidatedJson(request): ValidatedJson<RegisterVisitorRequest>,
) -> Result<Response, AppError> {
    let caller = user.as_ref().map(|Extension(u)| u);
    let outcome = VisitorController::new(&state).register(caller, request).await?;

    Ok(match outcome {
        RegistrationOutcome::Accepted(body) => (StatusCode::CREATED, Json(body)).into_response(),
        RegistrationOutcome::Blocked(body) => (StatusCode::CONFLICT, Json(body)).into_response(),
    })
}

async fn list_visitors(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<VisitorQuery>,
) -> Result<Json<ApiResponse<Vec<VisitorView>>>, AppError> {
    let visitors = VisitorController::new(&state).list(&user, query).await?;
    Ok(Json(ApiResponse::list(visitors)))
}

async fn visitor_stats(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<CompanyScopeQuery>,
) -> Result<Json<ApiResponse<VisitorStats>>, AppError> {
    let stats = VisitorController::new(&state)
        .stats(&user, query.company_id)
        .await?;
    Ok(Json(ApiResponse::success(stats)))
}

async fn today_visitors(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<Vec<VisitorView>>>, AppError> {
    let visitors = VisitorController::new(&state).today(&user).await?;
    Ok(Json(ApiResponse::list(visitors)))
}

async fn get_visitor(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<VisitorView>>, AppError> {
    let visitor = VisitorController::new(&state).get(&user, id).await?;
    Ok(Json(ApiResponse::success(visitor)))
}

async fn update_status(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateVisitorStatusRequest>,
) -> Result<Json<ApiResponse<Visitor>>, AppError> {
    let visitor = VisitorController::new(&state)
        .update_status(&user, id, request)
        .await?;
    Ok(Json(ApiResponse::success_with_message(visitor, "Visitor status updated")))
}

async fn delete_visitor(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    VisitorController::new(&state).delete(&user, id).await?;
    Ok(Json(ApiResponse::message("Visitor deleted successfully")))
}
