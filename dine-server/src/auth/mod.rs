//! 认证模块 - JWT + Argon2 认证体系
//!
//! # 内容
//!
//! - [`JwtService`] - 令牌生成与验证
//! - [`require_auth`] - Axum 认证中间件
//! - [`CurrentUser`] - 请求扩展中的当前用户

pub mod jwt;
pub mod middleware;

pub use jwt::{Claims, JwtConfig, JwtError, JwtService};
pub use middleware::require_auth;

/// 当前登录用户 (注入请求扩展)
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
    pub username: String,
    pub role: String,
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            username: claims.username,
            role: claims.role,
        }
    }
}
