use anyhow::anyhow;
use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};
use tracing::debug;
use uuid::Uuid;

use mukando_auth::headers::{X_USER_ID, X_USER_ROLE, X_USERNAME};
use mukando_auth::{Claims, Role, decode_access_token};
use mukando_core::AppError;

use crate::state::AppState;

/// The caller's identity as forwarded by the gateway.
///
/// The gateway validates the JWT, strips any client-supplied identity
/// headers, and sets `X-User-Id`, `X-Username` and `X-User-Role` from the
/// verified claims. Handlers behind the gateway trust these headers and
/// read identity from nothing else.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub username: String,
    pub role: Role,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        matches!(self.role, Role::SuperAdmin | Role::Admin)
    }

    /// Whether the caller may operate on the given user's resources:
    /// admins may touch anyone, everyone else only themselves.
    pub fn can_access_user(&self, user_id: Uuid) -> bool {
        self.user_id == user_id || self.is_admin()
    }
}

fn identity_header<'h>(headers: &'h HeaderMap, name: &str) -> Result<&'h str, AppError> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| {
            debug!(header = name, "missing identity header");
            AppError::unauthorized(anyhow!("Missing authentication"))
        })
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = identity_header(&parts.headers, X_USER_ID)?
            .parse::<Uuid>()
            .map_err(|_| {
                debug!("malformed {X_USER_ID} header");
                AppError::unauthorized(anyhow!("Missing authentication"))
            })?;
        let username = identity_header(&parts.headers, X_USERNAME)?.to_string();
        let role = identity_header(&parts.headers, X_USER_ROLE)?
            .parse::<Role>()
            .map_err(|_| {
                debug!("malformed {X_USER_ROLE} header");
                AppError::unauthorized(anyhow!("Missing authentication"))
            })?;

        Ok(AuthUser {
            user_id,
            username,
            role,
        })
    }
}

/// Extractor that decodes the `Authorization: Bearer` token itself.
///
/// Used only where the service needs the raw claims rather than the
/// gateway-forwarded identity, e.g. `GET /auth/current-user`.
#[derive(Debug, Clone)]
pub struct BearerUser(pub Claims);

impl FromRequestParts<AppState> for BearerUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::unauthorized(anyhow!("Missing authorization header")))?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::unauthorized(anyhow!("Invalid authorization header format"))
        })?;

        let claims = decode_access_token(token, &state.jwt_config).map_err(|err| {
            debug!(error = %err, "access token rejected");
            AppError::unauthorized(anyhow!("Invalid or expired token"))
        })?;

        Ok(BearerUser(claims))
    }
}
