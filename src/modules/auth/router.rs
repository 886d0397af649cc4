use axum::{
    Router,
    routing::{get, post},
};

use super::controller::{
    current_user, forgot_password, login_user, logout_user, refresh_token, register_user,
    reset_password,
};
use crate::state::AppState;

pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register_user))
        .route("/login", post(login_user))
        .route("/refresh", post(refresh_token))
        .route("/logout", post(logout_user))
        .route("/current-user", get(current_user))
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password", post(reset_password))
}
