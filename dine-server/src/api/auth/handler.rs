//! Authentication Handlers

use std::time::Duration;

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::db::models::AdminUserResponse;
use crate::utils::{AppError, AppResult};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: AdminUserResponse,
}

/// POST /api/auth/login - 管理员登录
///
/// 验证凭据并签发 JWT。无论用户是否存在都走固定延迟和统一错误消息，
/// 避免计时攻击和用户名枚举。
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let user = state.admins.find_by_username(&req.username).await?;

    // Fixed delay before checking the result
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    let user = user.ok_or_else(AppError::invalid_credentials)?;

    let password_valid = user
        .verify_password(&req.password)
        .map_err(|e| AppError::internal(format!("Password verification failed: {e}")))?;
    if !password_valid {
        crate::security_log!(
            "WARN",
            "login_failed",
            username = req.username.clone()
        );
        return Err(AppError::invalid_credentials());
    }

    let user_id = user
        .id
        .as_ref()
        .map(|id| id.to_string())
        .unwrap_or_else(|| user.username.clone());
    let token = state
        .jwt_service
        .generate_token(&user_id, &user.username, &user.role)
        .map_err(|e| AppError::internal(format!("Token generation failed: {e}")))?;

    crate::security_log!("INFO", "login_success", username = user.username.clone());

    Ok(Json(LoginResponse {
        token,
        user: user.into(),
    }))
}
