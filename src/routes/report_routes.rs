use axum::{
    extract::{Query, State},
    middleware,
    routing::get,
    Extension, Json, Router,
};

use crate::controllers::report_controller::ReportController;
use crate::dto::company_dto::CompanyScopeQuery;
use crate::dto::ApiResponse;
use crate::middleware::auth::{auth_middleware, AuthenticatedUser};
use crate::models::analytics::AnalyticsReport;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_report_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/analytics", get(analytics))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

async fn analytics(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<CompanyScopeQuery>,
) -> Result<Json<ApiResponse<AnalyticsReport>>, AppError> {
    let report = ReportController::new(&state)
        .analytics(&user, query.company_id)
        .await?;
    Ok(Json(ApiResponse::success(report)))
}
