use axum::{
    Router, middleware,
    routing::{get, put},
};

use crate::middleware::role::require_admin;
use crate::modules::users::controller::{
    assign_role, change_password, create_user, delete_user, get_user, get_users, update_status,
    update_user,
};
use crate::state::AppState;

/// User routes.
///
/// The admin-only group is gated by [`require_admin`]; the per-user routes
/// check self-or-admin access in their handlers.
pub fn init_users_router() -> Router<AppState> {
    let admin_routes = Router::new()
        .route("/", get(get_users).post(create_user))
        .route("/{id}/role", put(assign_role))
        .route("/{id}/status", put(update_status))
        .route_layer(middleware::from_fn(require_admin));

    Router::new()
        .route("/{id}", get(get_user).put(update_user).delete(delete_user))
        .route("/{id}/password", put(change_password))
        .merge(admin_routes)
}
