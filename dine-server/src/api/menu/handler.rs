//! Menu API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::models::{MenuItem, MenuItemCreate, MenuItemUpdate};
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct MenuQuery {
    pub category: Option<String>,
}

/// GET /api/menu?category= - 菜单列表 (公共)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<MenuQuery>,
) -> AppResult<Json<Vec<MenuItem>>> {
    let items = state.menu.find_all(query.category.as_deref()).await?;
    Ok(Json(items))
}

/// POST /api/menu - 创建菜单项 (管理员)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<MenuItemCreate>,
) -> AppResult<Json<MenuItem>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&payload.category, "category", MAX_NAME_LEN)?;
    if payload.price < Decimal::ZERO {
        return Err(AppError::validation("price must not be negative"));
    }

    let item = state.menu.create(payload).await?;
    Ok(Json(item))
}

/// PUT /api/menu/:name - 更新菜单项 (管理员)
pub async fn update(
    State(state): State<ServerState>,
    Path(name): Path<String>,
    Json(payload): Json<MenuItemUpdate>,
) -> AppResult<Json<MenuItem>> {
    if let Some(price) = payload.price
        && price < Decimal::ZERO
    {
        return Err(AppError::validation("price must not be negative"));
    }

    let item = state.menu.update(&name, payload).await?;
    Ok(Json(item))
}

/// DELETE /api/menu/:name - 删除菜单项 (管理员)
pub async fn delete(
    State(state): State<ServerState>,
    Path(name): Path<String>,
) -> AppResult<Json<bool>> {
    let removed = state.menu.delete(&name).await?;
    if !removed {
        return Err(AppError::not_found(format!("Menu item '{name}' not found")));
    }
    Ok(Json(true))
}
