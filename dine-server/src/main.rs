use dine_server::{Config, Server, ServerState, print_banner};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. 环境变量 (dotenv 静默失败: 生产环境无 .env 文件)
    dotenv::dotenv().ok();

    // 2. 加载配置并准备工作目录
    let config = Config::from_env();
    config.ensure_work_dir_structure()?;

    // 3. 初始化日志 (生产环境落盘)
    let log_level = std::env::var("LOG_LEVEL").ok();
    if config.is_production() {
        let log_dir = config.log_dir();
        dine_server::init_logger_with_file(log_level.as_deref(), log_dir.to_str());
    } else {
        dine_server::init_logger_with_file(log_level.as_deref(), None);
    }

    print_banner();
    tracing::info!("🍽️ DINE24 server starting...");

    // 4. 初始化服务器状态 (数据库、种子数据)
    let state = ServerState::initialize(&config).await;

    // 5. 启动 HTTP 服务器
    let server = Server::with_state(config, state);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
