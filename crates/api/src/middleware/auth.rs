//! Authentication middleware for protected routes.

use axum::{
    Json,
    extract::{FromRequestParts, Request, State},
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;
use stockdesk_core::workflow::{WorkflowError, WorkflowService};
use stockdesk_shared::{Claims, JwtError, Role};
use uuid::Uuid;

use crate::AppState;

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
}

fn unauthorized(error: &str, message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": error, "message": message })),
    )
        .into_response()
}

/// Authentication middleware that validates JWT tokens.
///
/// Validated claims are stored in request extensions for [`AuthUser`].
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let Some(token) = auth_header.and_then(extract_bearer_token) else {
        return unauthorized(
            "MISSING_TOKEN",
            "Authorization header with Bearer token is required",
        );
    };

    match state.jwt_service.validate_token(token) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(JwtError::Expired) => unauthorized("TOKEN_EXPIRED", "Token has expired"),
        Err(_) => unauthorized("INVALID_TOKEN", "Invalid or malformed token"),
    }
}

/// Extractor for the authenticated caller.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// Returns the user ID from the claims.
    #[must_use]
    pub fn user_id(&self) -> Uuid {
        self.0.user_id()
    }

    /// Returns the caller's role.
    #[must_use]
    pub fn role(&self) -> Role {
        self.0.role
    }

    /// Fails with `AdminRequired` unless the caller is an admin.
    pub fn require_admin(&self) -> Result<(), WorkflowError> {
        WorkflowService::authorize_decision(self.user_id(), self.role())
    }

    /// Fails unless the caller is `user_id` or an admin.
    pub fn require_self_or_admin(&self, user_id: Uuid) -> Result<(), WorkflowError> {
        if self.user_id() == user_id {
            return Ok(());
        }
        self.require_admin()
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| unauthorized("UNAUTHORIZED", "Authentication required"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn caller(role: Role) -> AuthUser {
        AuthUser(Claims::new(
            Uuid::new_v4(),
            role,
            Utc::now() + Duration::minutes(5),
        ))
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(extract_bearer_token("bearer abc"), Some("abc"));
        assert_eq!(extract_bearer_token("Basic abc"), None);
    }

    #[test]
    fn test_require_admin() {
        assert!(caller(Role::Admin).require_admin().is_ok());
        assert!(matches!(
            caller(Role::User).require_admin(),
            Err(WorkflowError::AdminRequired { .. })
        ));
    }

    #[test]
    fn test_require_self_or_admin() {
        let user = caller(Role::User);
        assert!(user.require_self_or_admin(user.user_id()).is_ok());
        assert!(user.require_self_or_admin(Uuid::new_v4()).is_err());
        assert!(caller(Role::Admin).require_self_or_admin(Uuid::new_v4()).is_ok());
    }
}
