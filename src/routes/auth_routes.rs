use axum::{
    extract::{Path, Query, State},
    middleware,
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::auth_controller::AuthController;
use crate::dto::auth_dto::{
    ChangePasswordRequest, LoginRequest, LoginResponse, RegisterUserRequest, UpdateProfileRequest, UsersQuery,
};
use crate::dto::ApiResponse;
use crate::middleware::auth::{admin_only_middleware, auth_middleware, AuthenticatedUser};
use crate::models::user::UserResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::validation::ValidatedJson;

pub fn create_auth_router(state: AppState) -> Router<AppState> {
    let admin = Router::new()
        .route("/register", post(register))
        .route("/users/:id/activate", post(activate_user))
        .route("/users/:id/deactivate", post(deactivate_user))
        .route_layer(middleware::from_fn(admin_only_middleware));

    let protected = Router::new()
        .route("/profile", get(profile).put(update_profile))
        .route("/change-password", post(change_password))
        .route("/users", get(list_users))
        .merge(admin)
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new().route("/login", post(login)).merge(protected)
}

async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, AppError> {
    let response = AuthController::new(&state).login(request).await?;
    Ok(Json(ApiResponse::success_with_message(response, "Login successful")))
}

async fn profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let profile = AuthController::new(&state).profile(&user).await?;
    Ok(Json(ApiResponse::success(profile)))
}

async fn update_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let profile = AuthController::new(&state).update_profile(&user, request).await?;
    Ok(Json(ApiResponse::success_with_message(profile, "Profile updated")))
}

async fn change_password(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    AuthController::new(&state).change_password(&user, request).await?;
    Ok(Json(ApiResponse::message("Password changed successfully")))
}

async fn register(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<RegisterUserRequest>,
) -> Result<(axum::http::StatusCode, Json<ApiResponse<UserResponse>>), AppError> {
    let created = AuthController::new(&state).register(&user, request).await?;
    Ok((
        axum::http::StatusCode::CREATED,
        Json(ApiResponse::success_with_message(created, "User created successfully")),
    ))
}

async fn list_users(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<UsersQuery>,
) -> Result<Json<ApiResponse<Vec<UserResponse>>>, AppError> {
    let users = AuthController::new(&state).list_users(&user, query).await?;
    Ok(Json(ApiResponse::list(users)))
}

async fn activate_user(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let updated = AuthController::new(&state).set_active(&user, id, true).await?;
    Ok(Json(ApiResponse::success_with_message(updated, "User activated")))
}

async fn deactivate_user(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let updated = AuthController::new(&state).set_active(&user, id, false).await?;
    Ok(Json(ApiResponse::success_with_message(updated, "User deactivated")))
}
