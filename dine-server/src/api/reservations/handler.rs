//! Reservation API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::models::{Reservation, ReservationFilter, ReservationStatus};
use crate::reservations::AllocationRequest;
use crate::utils::time::{parse_date, parse_slot};
use crate::utils::validation::{
    MAX_FULL_NAME_LEN, MAX_MESSAGE_LEN, MAX_SHORT_TEXT_LEN, validate_email,
    validate_optional_text, validate_required_text,
};
use crate::utils::AppResult;

#[derive(Debug, Deserialize)]
pub struct CreateReservationRequest {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub party_size: i32,
    /// "YYYY-MM-DD"
    pub date: String,
    /// "HH:MM"
    pub time: String,
    /// Occasion, e.g. "Birthday dinner"
    pub purpose: Option<String>,
    pub preferred_table: Option<String>,
}

/// POST /api/reservations - 创建预订 (公共)
pub async fn create(
    State(state): State<ServerState>,
    Json(req): Json<CreateReservationRequest>,
) -> AppResult<Json<Reservation>> {
    validate_required_text(&req.full_name, "full_name", MAX_FULL_NAME_LEN)?;
    validate_email(&req.email)?;
    validate_required_text(&req.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&req.purpose, "purpose", MAX_MESSAGE_LEN)?;

    let purpose = req
        .purpose
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string);

    let request = AllocationRequest {
        full_name: req.full_name.trim().to_string(),
        email: req.email.trim().to_string(),
        phone: req.phone.trim().to_string(),
        purpose,
        party_size: req.party_size,
        date: parse_date(&req.date)?,
        time_slot: parse_slot(&req.time)?,
        preferred_table: req.preferred_table,
    };

    let reservation = state.engine.allocate(request).await?;
    Ok(Json(reservation))
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<ReservationStatus>,
    pub date: Option<String>,
    pub email: Option<String>,
}

/// GET /api/reservations?status=&date=&email= - 预订列表 (管理员)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Reservation>>> {
    let date = query.date.as_deref().map(parse_date).transpose()?;
    let filter = ReservationFilter {
        status: query.status,
        date,
        email: query.email,
    };
    let reservations = state.ledger.list(filter).await?;
    Ok(Json(reservations))
}

/// GET /api/reservations/:id - 查询单条预订 (管理员)
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Reservation>> {
    let reservation = state.ledger.find(&id).await?;
    Ok(Json(reservation))
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: ReservationStatus,
}

/// POST /api/reservations/:id/status - 状态流转 (管理员)
///
/// 目标状态必须满足状态机约束；重复提交同一目标状态幂等返回当前记录。
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(req): Json<StatusUpdateRequest>,
) -> AppResult<Json<Reservation>> {
    let reservation = state.ledger.transition(&id, req.status).await?;
    Ok(Json(reservation))
}
