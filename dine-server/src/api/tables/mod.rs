//! Dining Table API 模块

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_auth;
use crate::core::ServerState;

pub fn router(state: ServerState) -> Router<ServerState> {
    Router::new().nest("/api/tables", routes(state))
}

fn routes(state: ServerState) -> Router<ServerState> {
    let public_routes = Router::new()
        .route("/", get(handler::list))
        .route("/available", get(handler::available));

    let manage_routes = Router::new()
        .route("/", axum::routing::post(handler::create))
        .route(
            "/{code}",
            axum::routing::put(handler::update).delete(handler::deactivate),
        )
        .layer(middleware::from_fn_with_state(state, require_auth));

    public_routes.merge(manage_routes)
}
