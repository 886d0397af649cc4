//! Role-gating middleware.
//!
//! The gateway already enforces its path-prefix policy, so these layers are
//! the service-side backstop for route groups that must stay admin-only even
//! if the service is reached directly.

use axum::{
    extract::{FromRequestParts, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use anyhow::anyhow;
use mukando_auth::Role;
use mukando_core::AppError;

use crate::middleware::auth::AuthUser;

/// Passes the request through only when the forwarded identity carries one
/// of the allowed roles.
///
/// # Usage with axum::middleware::from_fn
///
/// ```rust,ignore
/// let admin_routes = Router::new()
///     .route("/users", post(create_user))
///     .route_layer(middleware::from_fn(require_admin));
/// ```
pub async fn require_roles(
    req: Request,
    next: Next,
    allowed_roles: &[Role],
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let auth_user = AuthUser::from_request_parts(&mut parts, &()).await?;

    if !allowed_roles.contains(&auth_user.role) {
        debug!(
            username = %auth_user.username,
            role = %auth_user.role,
            "role not permitted for route"
        );
        return Err(AppError::forbidden(anyhow!("Access denied")));
    }

    Ok(next.run(Request::from_parts(parts, body)).await)
}

/// Admin-only layer: SUPERADMIN and ADMIN pass, everyone else gets 403.
pub async fn require_admin(req: Request, next: Next) -> Response {
    match require_roles(req, next, &[Role::SuperAdmin, Role::Admin]).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}
