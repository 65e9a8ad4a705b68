//! Dining Table API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::models::{DiningTable, DiningTableCreate, DiningTableUpdate};
use crate::utils::{AppError, AppResult};
use crate::utils::time::{parse_date, parse_slot};

/// GET /api/tables - 获取所有桌台
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<DiningTable>>> {
    let tables = state.tables.find_all().await?;
    Ok(Json(tables))
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub date: String,
    pub time: String,
    pub party_size: i32,
}

/// GET /api/tables/available?date=&time=&party_size= - 查询空闲桌台
pub async fn available(
    State(state): State<ServerState>,
    Query(query): Query<AvailabilityQuery>,
) -> AppResult<Json<Vec<DiningTable>>> {
    let date = parse_date(&query.date)?;
    let slot = parse_slot(&query.time)?;
    if query.party_size < 1 {
        return Err(AppError::validation("party_size must be at least 1"));
    }

    let tables = state
        .availability
        .find_available(date, slot, query.party_size)
        .await?;
    Ok(Json(tables))
}

/// POST /api/tables - 创建桌台 (管理员)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<DiningTableCreate>,
) -> AppResult<Json<DiningTable>> {
    let table = state.tables.create(payload).await?;
    Ok(Json(table))
}

/// PUT /api/tables/:code - 更新桌台 (管理员)
pub async fn update(
    State(state): State<ServerState>,
    Path(code): Path<String>,
    Json(payload): Json<DiningTableUpdate>,
) -> AppResult<Json<DiningTable>> {
    let table = state.tables.update(&code, payload).await?;
    Ok(Json(table))
}

/// DELETE /api/tables/:code - 停用桌台 (软删除, 管理员)
pub async fn deactivate(
    State(state): State<ServerState>,
    Path(code): Path<String>,
) -> AppResult<Json<bool>> {
    let removed = state.tables.deactivate(&code).await?;
    if !removed {
        return Err(AppError::not_found(format!("Table {code} not found")));
    }
    Ok(Json(true))
}
