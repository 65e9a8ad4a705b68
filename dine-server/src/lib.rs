//! DINE24 Server - 餐厅预订与运营后端
//!
//! # 架构概述
//!
//! 核心是预订/桌台分配子系统，辅以菜单、分析、聊天与认证：
//!
//! - **预订** (`reservations`): 可用性投影、分配引擎、状态机台账
//! - **数据库** (`db`): 嵌入式 SurrealDB 存储
//! - **认证** (`auth`): JWT + Argon2 认证体系
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! dine-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # JWT 认证
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # 数据库层 (模型 + 存储)
//! ├── reservations/  # 预订子系统
//! ├── chat/          # 模板应答器
//! ├── analytics/     # 仪表盘聚合
//! ├── notify/        # 确认通知边界
//! └── utils/         # 工具函数
//! ```

pub mod analytics;
pub mod api;
pub mod auth;
pub mod chat;
pub mod core;
pub mod db;
pub mod notify;
pub mod reservations;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use reservations::{AllocationEngine, AllocationRequest, ReservationLedger};
pub use utils::{AppError, AppResponse, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

pub fn print_banner() {
    println!(
        r#"
    ____  _____   ________  ___  __ __
   / __ \/  _/ | / / ____/ |__ \/ // /
  / / / // //  |/ / __/    __/ / // /_
 / /_/ // // /|  / /___   / __/__  __/
/_____/___/_/ |_/_____/  /____/ /_/
    "#
    );
}
