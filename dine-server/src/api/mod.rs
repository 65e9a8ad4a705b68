//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 管理员登录
//! - [`tables`] - 桌台目录与空闲查询
//! - [`reservations`] - 预订创建、列表、状态推进
//! - [`menu`] - 菜单管理
//! - [`chat`] - 模板应答器
//! - [`analytics`] - 仪表盘聚合

pub mod convert;

pub mod analytics;
pub mod auth;
pub mod chat;
pub mod health;
pub mod menu;
pub mod reservations;
pub mod tables;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};

/// Assemble the full application router
pub fn create_router(state: ServerState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(tables::router(state.clone()))
        .merge(reservations::router(state.clone()))
        .merge(menu::router(state.clone()))
        .merge(chat::router())
        .merge(analytics::router(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
