use std::sync::Arc;

use axum::{Json, Router, middleware, routing::get};
use serde_json::{Value, json};

use mukando_core::logging::logging_middleware;

use crate::gate::auth_gate;
use crate::proxy::forward;
use crate::state::GatewayState;

pub fn init_router(state: Arc<GatewayState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .fallback(forward)
        .layer(middleware::from_fn_with_state(state.clone(), auth_gate))
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
