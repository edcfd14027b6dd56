use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use kitchen_server::{
    Config, EscalationMonitor, MessageBus, OrderStorage, WorkflowManager, init_logger_with_file,
    print_banner,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 设置环境 (dotenv, 日志)
    dotenv::dotenv().ok();
    let config = Config::from_env();
    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());

    print_banner();
    tracing::info!("Kitchen server starting...");

    // 2. 工作目录与订单数据库
    std::fs::create_dir_all(&config.work_dir)
        .with_context(|| format!("failed to create work dir {}", config.work_dir))?;
    let db_path = config.db_path();
    let storage = Arc::new(
        OrderStorage::open(&db_path)
            .with_context(|| format!("failed to open order database {}", db_path.display()))?,
    );
    tracing::info!(path = %db_path.display(), "Order storage opened");

    // 3. 消息总线与门面
    let bus = Arc::new(MessageBus::with_capacity(config.event_channel_capacity));
    let manager = Arc::new(WorkflowManager::new(
        config.workflow(),
        storage,
        bus.clone(),
    ));
    tracing::info!(
        kitchen_id = %config.kitchen_id,
        stations = manager.stations().len(),
        "Workflow manager ready"
    );

    // 4. 后台任务
    let monitor = EscalationMonitor::new(
        manager.clone(),
        Duration::from_secs(config.escalation_interval_secs.max(1)),
        bus.shutdown_token().clone(),
    );
    let monitor_handle = tokio::spawn(monitor.run());

    // 5. 等待退出信号
    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;
    tracing::info!("Shutdown signal received");

    bus.shutdown();
    if let Err(e) = monitor_handle.await {
        tracing::error!(error = %e, "Escalation monitor task failed");
    }

    tracing::info!("Kitchen server stopped");
    Ok(())
}
