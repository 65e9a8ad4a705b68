//! Reservation API 模块

mod handler;

use axum::{Router, middleware, routing::{get, post}};

use crate::auth::require_auth;
use crate::core::ServerState;

pub fn router(state: ServerState) -> Router<ServerState> {
    Router::new().nest("/api/reservations", routes(state))
}

fn routes(state: ServerState) -> Router<ServerState> {
    // 创建预订对外开放；列表和状态流转仅限管理员
    let public_routes = Router::new().route("/", post(handler::create));

    let admin_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/status", post(handler::update_status))
        .layer(middleware::from_fn_with_state(state, require_auth));

    public_routes.merge(admin_routes)
}
