//! JWT authentication middleware
//!
//! Verifies the bearer token, reloads the user and injects an
//! `AuthenticatedUser` into the request extensions. Role guards run after it.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
    Extension,
};
use tracing::debug;
use uuid::Uuid;

use crate::{
    models::user::{User, UserRole},
    state::AppState,
    utils::{
        errors::{forbidden_error, validation_error, AppError, AppResult},
        jwt::{extract_token_from_header, verify_token},
    },
};

/// Identity of the caller, built from the stored user (not just the token)
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub email: String,
    pub role: UserRole,
    pub company_id: Option<Uuid>,
    pub full_name: String,
}

impl From<&User> for AuthenticatedUser {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            email: user.email.clone(),
            role: user.role,
            company_id: user.company_id,
            full_name: user.full_name.clone(),
        }
    }
}

impl AuthenticatedUser {
    pub fn is_super_admin(&self) -> bool {
        self.role == UserRole::SuperAdmin
    }

    pub fn require_roles(&self, roles: &[UserRole], operation: &str) -> AppResult<()> {
        if roles.contains(&self.role) {
            Ok(())
        } else {
            Err(forbidden_error(operation, "insufficient role"))
        }
    }

    /// Company the caller's reads are limited to; `None` means every company.
    pub fn company_scope(&self) -> Option<Uuid> {
        if self.is_super_admin() {
            None
        } else {
            self.company_id
        }
    }

    /// Read scope honouring a `company_id` filter from super admins only.
    pub fn scope_with(&self, requested: Option<Uuid>) -> Option<Uuid> {
        if self.is_super_admin() {
            requested
        } else {
            self.company_id
        }
    }

    /// Company a write lands in: the caller's own, or the requested one for
    /// super admins (who must name it).
    pub fn target_company(&self, requested: Option<Uuid>) -> AppResult<Uuid> {
        if self.is_super_admin() {
            requested.ok_or_else(|| validation_error("company_id", "company_id is required"))
        } else {
            self.company_id
                .ok_or_else(|| AppError::Forbidden("User is not assigned to a company".to_string()))
        }
    }

    pub fn can_access_company(&self, company_id: Uuid) -> bool {
        self.is_super_admin() || self.company_id == Some(company_id)
    }
}

fn authorization_header(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
}

async fn authenticate(state: &AppState, auth_header: &str) -> AppResult<AuthenticatedUser> {
    let token = extract_token_from_header(auth_header)?;
    let claims = verify_token(token, &state.jwt_config())?;

    let user = state
        .repos
        .users
        .find_by_id(claims.sub)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))?;

    if !user.is_active {
        return Err(AppError::Unauthorized("User account is deactivated".to_string()));
    }

    Ok(AuthenticatedUser::from(&user))
}

/// Reject requests without a valid bearer token
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = authorization_header(&request)
        .ok_or_else(|| AppError::Unauthorized("Authorization token required".to_string()))?
        .to_string();

    let user = authenticate(&state, &auth_header).await?;
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

/// Attach the user when a valid token is present; anonymous otherwise.
pub async fn optional_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(auth_header) = authorization_header(&request).map(str::to_string) {
        match authenticate(&state, &auth_header).await {
            Ok(user) => {
                request.extensions_mut().insert(user);
            }
            Err(e) => debug!("Ignoring invalid optional credentials: {}", e),
        }
    }

    next.run(request).await
}

/// SUPER_ADMIN and ADMIN_HR only
pub async fn admin_only_middleware(
    Extension(user): Extension<AuthenticatedUser>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    user.require_roles(&[UserRole::SuperAdmin, UserRole::AdminHr], "access this resource")?;
    Ok(next.run(request).await)
}

/// SUPER_ADMIN only
pub async fn super_admin_only_middleware(
    Extension(user): Extension<AuthenticatedUser>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    user.require_roles(&[UserRole::SuperAdmin], "access this resource")?;
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caller(role: UserRole, company_id: Option<Uuid>) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: Uuid::new_v4(),
            email: "a@b.in".to_string(),
            role,
            company_id,
            full_name: "A".to_string(),
        }
    }

    #[test]
    fn test_super_admin_scope_is_unrestricted() {
        let requested = Uuid::new_v4();
        let admin = caller(UserRole::SuperAdmin, None);
        assert_eq!(admin.company_scope(), None);
        assert_eq!(admin.scope_with(Some(requested)), Some(requested));
        assert_eq!(admin.target_company(Some(requested)).unwrap(), requested);
        assert!(matches!(admin.target_company(None), Err(AppError::Validation(_))));
        assert!(admin.can_access_company(requested));
    }

    #[test]
    fn test_company_users_are_pinned_to_their_company() {
        let own = Uuid::new_v4();
        let other = Uuid::new_v4();
        let hr = caller(UserRole::Hr, Some(own));
        assert_eq!(hr.company_scope(), Some(own));
        assert_eq!(hr.scope_with(Some(other)), Some(own));
        assert_eq!(hr.target_company(Some(other)).unwrap(), own);
        assert!(!hr.can_access_company(other));
    }

    #[test]
    fn test_require_roles() {
        let hr = caller(UserRole::Hr, Some(Uuid::new_v4()));
        assert!(hr.require_roles(&[UserRole::Hr, UserRole::AdminHr], "x").is_ok());
        assert!(matches!(
            hr.require_roles(&[UserRole::SuperAdmin], "delete company"),
            Err(AppError::Forbidden(_))
        ));
    }
}
