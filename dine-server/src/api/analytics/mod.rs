//! Analytics API 模块

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_auth;
use crate::core::ServerState;

pub fn router(state: ServerState) -> Router<ServerState> {
    Router::new()
        .route("/api/analytics", get(handler::dashboard))
        .layer(middleware::from_fn_with_state(state, require_auth))
}
