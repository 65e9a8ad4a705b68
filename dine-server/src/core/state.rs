use std::sync::Arc;

use chrono::Utc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::analytics::AnalyticsService;
use crate::auth::JwtService;
use crate::chat::ChatResponder;
use crate::core::Config;
use crate::db::DbService;
use crate::db::models::{AdminUser, DiningTableCreate};
use crate::db::repository::{
    AdminUserRepository, ChatLogRepository, DiningTableRepository, MenuItemRepository,
    ReservationRepository,
};
use crate::notify::LogNotificationSender;
use crate::reservations::{AllocationEngine, AvailabilityIndex, ReservationLedger};

/// 默认桌台配置: (编号, 容量, 分区)
///
/// 首次启动时写入空目录，之后以数据库为准。
const DEFAULT_TABLES: &[(&str, i32, &str)] = &[
    ("A1", 2, "Main Dining"),
    ("A2", 4, "Main Dining"),
    ("A3", 4, "Main Dining"),
    ("A4", 6, "Main Dining"),
    ("A5", 8, "Main Dining"),
    ("B1", 2, "Window Side"),
    ("B2", 4, "Window Side"),
    ("B3", 6, "Window Side"),
    ("C1", 8, "Private Dining"),
    ("C2", 10, "Private Dining"),
    ("T1", 4, "Terrace"),
    ("T2", 6, "Terrace"),
];

/// 服务器状态 - 持有所有服务的单例引用
///
/// 使用 Arc / Clone 浅拷贝在处理器间共享。
///
/// # 服务组件
///
/// | 字段 | 说明 |
/// |------|------|
/// | config | 配置项 (不可变) |
/// | db | 嵌入式数据库 |
/// | tables | 桌台目录 |
/// | reservations | 预订台账存储 |
/// | menu | 菜单存储 |
/// | availability | 空闲桌台投影 |
/// | engine | 桌台分配引擎 |
/// | ledger | 预订状态机 |
/// | chat | 模板应答器 |
/// | analytics | 仪表盘聚合 |
/// | jwt_service | JWT 认证服务 |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: Surreal<Db>,
    pub tables: DiningTableRepository,
    pub reservations: ReservationRepository,
    pub menu: MenuItemRepository,
    pub admins: AdminUserRepository,
    pub availability: AvailabilityIndex,
    pub engine: AllocationEngine,
    pub ledger: ReservationLedger,
    pub chat: ChatResponder,
    pub analytics: AnalyticsService,
    pub jwt_service: Arc<JwtService>,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录结构
    /// 2. 数据库 (work_dir/database/dine.db)
    /// 3. 存储层和领域服务
    /// 4. 种子数据 (桌台目录、默认管理员)
    ///
    /// # Panics
    ///
    /// 数据库初始化失败时 panic
    pub async fn initialize(config: &Config) -> Self {
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory structure");

        let db_path = config.database_dir().join("dine.db");
        let db_service = DbService::new(&db_path.to_string_lossy())
            .await
            .expect("Failed to initialize database");

        let state = Self::with_db(config.clone(), db_service.db);
        state.seed().await;
        state
    }

    /// 基于已打开的数据库构造状态 (测试使用内存库)
    pub fn with_db(config: Config, db: Surreal<Db>) -> Self {
        let timeout = config.reservations.storage_timeout();
        let tables = DiningTableRepository::with_timeout(db.clone(), timeout);
        let reservations = ReservationRepository::with_timeout(db.clone(), timeout);
        let menu = MenuItemRepository::with_timeout(db.clone(), timeout);
        let admins = AdminUserRepository::with_timeout(db.clone(), timeout);
        let chat_logs = ChatLogRepository::with_timeout(db.clone(), timeout);

        let availability = AvailabilityIndex::new(
            tables.clone(),
            reservations.clone(),
            config.reservations.clone(),
        );
        let engine = AllocationEngine::new(
            tables.clone(),
            availability.clone(),
            reservations.clone(),
            config.reservations.clone(),
            Arc::new(LogNotificationSender::new(config.restaurant.clone())),
        );
        let ledger = ReservationLedger::new(reservations.clone());
        let chat = ChatResponder::new(menu.clone(), chat_logs, config.restaurant.clone());
        let analytics = AnalyticsService::new(reservations.clone(), menu.clone());
        let jwt_service = Arc::new(JwtService::new(config.jwt.clone()));

        Self {
            config,
            db,
            tables,
            reservations,
            menu,
            admins,
            availability,
            engine,
            ledger,
            chat,
            analytics,
            jwt_service,
        }
    }

    /// 种子数据：空桌台目录时写入默认布局，缺省管理员时创建
    pub async fn seed(&self) {
        if let Err(e) = self.seed_tables().await {
            tracing::error!(error = %e, "Failed to seed dining tables");
        }
        if let Err(e) = self.seed_admin().await {
            tracing::error!(error = %e, "Failed to seed admin user");
        }
    }

    async fn seed_tables(&self) -> crate::db::repository::RepoResult<()> {
        if !self.tables.find_all().await?.is_empty() {
            return Ok(());
        }
        for (code, capacity, section) in DEFAULT_TABLES {
            self.tables
                .create(DiningTableCreate {
                    code: code.to_string(),
                    capacity: *capacity,
                    section: section.to_string(),
                })
                .await?;
        }
        tracing::info!(tables = DEFAULT_TABLES.len(), "Seeded dining table catalog");
        Ok(())
    }

    async fn seed_admin(&self) -> crate::db::repository::RepoResult<()> {
        let username =
            std::env::var("DEFAULT_ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string());
        if self.admins.find_by_username(&username).await?.is_some() {
            return Ok(());
        }
        let password =
            std::env::var("DEFAULT_ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".to_string());
        let password_hash = AdminUser::hash_password(&password).map_err(|e| {
            crate::db::repository::RepoError::Database(format!("Password hashing failed: {e}"))
        })?;

        self.admins
            .create(AdminUser {
                id: None,
                username: username.clone(),
                password_hash,
                role: "admin".to_string(),
                email: self.config.restaurant.email.clone(),
                created_at: Utc::now(),
            })
            .await?;
        tracing::info!(username = %username, "Seeded default admin user");
        Ok(())
    }
}
