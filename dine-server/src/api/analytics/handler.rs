//! Analytics API Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::analytics::DashboardSummary;
use crate::core::ServerState;
use crate::utils::AppResult;
use crate::utils::time::parse_date;

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    /// "YYYY-MM-DD", 缺省为今天
    pub date: Option<String>,
}

/// GET /api/analytics?date= - 仪表盘聚合 (管理员)
pub async fn dashboard(
    State(state): State<ServerState>,
    Query(query): Query<DashboardQuery>,
) -> AppResult<Json<DashboardSummary>> {
    let date = match query.date.as_deref() {
        Some(raw) => parse_date(raw)?,
        None => crate::utils::time::today(),
    };
    let summary = state.analytics.dashboard(date).await?;
    Ok(Json(summary))
}
