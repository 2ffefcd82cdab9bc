//! Sign-in, profile and user administration

use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    dto::auth_dto::{
        ChangePasswordRequest, LoginRequest, LoginResponse, RegisterUserRequest, UpdateProfileRequest,
        UsersQuery,
    },
    middleware::auth::AuthenticatedUser,
    models::user::{NewUser, User, UserResponse, UserRole},
    repositories::constraints,
    services::password::{hash_password, verify_password},
    state::AppState,
    utils::{
        errors::{forbidden_error, not_found_error, validation_error, AppError, AppResult},
        jwt::generate_token,
    },
};

fn invalid_credentials() -> AppError {
    AppError::Unauthorized("Invalid email or password".to_string())
}

pub struct AuthController {
    state: AppState,
}

impl AuthController {
    pub fn new(state: &AppState) -> Self {
        Self {
            state: state.clone(),
        }
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<LoginResponse> {
        let email = request.email.trim().to_lowercase();
        let user = match self.state.repos.users.find_by_email(&email).await? {
            Some(user) => user,
            None => {
                warn!("🔒 Login attempt for unknown email {}", email);
                return Err(invalid_credentials());
            }
        };

        if !verify_password(&request.password, &user.password_hash).await? {
            warn!("🔒 Wrong password for {}", email);
            return Err(invalid_credentials());
        }
        if !user.is_active {
            return Err(AppError::Forbidden("Account is deactivated".to_string()));
        }

        let token = generate_token(&user, &self.state.jwt_config())?;
        info!("🔑 {} signed in as {}", user.email, user.role.as_str());

        Ok(LoginResponse {
            token,
            user: UserResponse::from(user),
        })
    }

    async fn current_user(&self, caller: &AuthenticatedUser) -> AppResult<User> {
        self.state
            .repos
            .users
            .find_by_id(caller.user_id)
            .await?
            .ok_or_else(|| not_found_error("User"))
    }

    pub async fn profile(&self, caller: &AuthenticatedUser) -> AppResult<UserResponse> {
        self.current_user(caller).await.map(UserResponse::from)
    }

    pub async fn update_profile(
        &self,
        caller: &AuthenticatedUser,
        request: UpdateProfileRequest,
    ) -> AppResult<UserResponse> {
        self.state
            .repos
            .users
            .update_full_name(caller.user_id, request.full_name.trim())
            .await?
            .map(UserResponse::from)
            .ok_or_else(|| not_found_error("User"))
    }

    pub async fn change_password(&self, caller: &AuthenticatedUser, request: ChangePasswordRequest) -> AppResult<()> {
        let user = self.current_user(caller).await?;

        if !verify_password(&request.current_password, &user.password_hash).await? {
            return Err(AppError::BadRequest("Current password is incorrect".to_string()));
        }
        if request.current_password == request.new_password {
            return Err(AppError::BadRequest(
                "New password must differ from the current one".to_string(),
            ));
        }

        let password_hash = hash_password(&request.new_password, self.state.config.bcrypt_cost).await?;
        self.state
            .repos
            .users
            .update_password(user.id, &password_hash)
            .await?;

        info!("🔑 Password changed for {}", user.email);
        Ok(())
    }

    /// Create a dashboard user. ADMIN_HR may only add HR/ADMIN_HR users to their own company.
    pub async fn register(&self, caller: &AuthenticatedUser, request: RegisterUserRequest) -> AppResult<UserResponse> {
        let company_id = match (caller.role, request.role) {
            (UserRole::SuperAdmin, UserRole::SuperAdmin) => None,
            (UserRole::SuperAdmin, _) => Some(caller.target_company(request.company_id)?),
            (UserRole::AdminHr, UserRole::SuperAdmin) => {
                return Err(forbidden_error("create user", "only super admins can create super admins"));
            }
            (UserRole::AdminHr, _) => Some(caller.target_company(None)?),
            (UserRole::Hr, _) => return Err(forbidden_error("create user", "insufficient role")),
        };

        if let Some(company_id) = company_id {
            if self.state.repos.companies.find_by_id(company_id).await?.is_none() {
                return Err(validation_error("company_id", "Unknown company"));
            }
        }

        let email = request.email.trim().to_lowercase();
        if self.state.repos.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict("Email is already registered".to_string()));
        }

        let password_hash = hash_password(&request.password, self.state.config.bcrypt_cost).await?;
        let user = self
            .state
            .repos
            .users
            .create(NewUser {
                email,
                password_hash,
                role: request.role,
                full_name: request.full_name.trim().to_string(),
                company_id,
                must_change_password: false,
            })
            .await
            .map_err(|e| {
                if e.is_duplicate_of(constraints::USER_EMAIL) {
                    AppError::Conflict("Email is already registered".to_string())
                } else {
                    e
                }
            })?;

        info!("👤 User {} created with role {}", user.email, user.role.as_str());
        Ok(UserResponse::from(user))
    }

    pub async fn list_users(&self, caller: &AuthenticatedUser, query: UsersQuery) -> AppResult<Vec<UserResponse>> {
        let users = self
            .state
            .repos
            .users
            .list(caller.scope_with(query.company_id), query.role)
            .await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    pub async fn set_active(&self, caller: &AuthenticatedUser, id: Uuid, is_active: bool) -> AppResult<UserResponse> {
        if caller.user_id == id {
            return Err(AppError::BadRequest(
                "You cannot change the status of your own account".to_string(),
            ));
        }

        let target = self
            .state
            .repos
            .users
            .find_by_id(id)
            .await?
            .filter(|u| caller.is_super_admin() || (u.company_id.is_some() && u.company_id == caller.company_id))
            .ok_or_else(|| not_found_error("User"))?;

        if target.role == UserRole::SuperAdmin && !caller.is_super_admin() {
            return Err(forbidden_error("change user status", "insufficient role"));
        }

        let updated = self
            .state
            .repos
            .users
            .set_active(id, is_active)
            .await?
            .ok_or_else(|| not_found_error("User"))?;

        info!(
            "👤 User {} {}",
            updated.email,
            if is_active { "activated" } else { "deactivated" }
        );
        Ok(UserResponse::from(updated))
    }
}
