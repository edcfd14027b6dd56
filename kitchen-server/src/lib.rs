//! Kitchen Server - 餐厅厨房订单工作流编排
//!
//! # 架构概述
//!
//! - **工作流** (`workflow`): `WorkflowManager` 门面, 唯一修改订单状态的入口
//! - **订单** (`orders`): 状态机、转换 action、redb 订单存储 (条件更新)
//! - **工作站** (`stations`): 关键字/目录映射分站, 员工分配
//! - **厨房视图** (`kitchen`): 实时队列与统计
//! - **消息** (`message`): 广播总线, 按 topic 推送给厨房显示端
//! - **外部协作方** (`services`): 商品目录、桌台、打印
//!
//! # 模块结构
//!
//! ```text
//! kitchen-server/src/
//! ├── core/          # 配置
//! ├── workflow/      # 门面、错误、优先级/ETA
//! ├── orders/        # 状态机、actions、存储
//! ├── stations/      # 分类、路由、工作站注册表
//! ├── kitchen/       # 队列与统计
//! ├── message/       # 消息总线与通知
//! ├── services/      # 目录、桌台、打印
//! ├── escalation.rs  # 优先级升级扫描
//! └── utils/         # 日志、校验
//! ```

pub mod core;
pub mod escalation;
pub mod kitchen;
pub mod message;
pub mod orders;
pub mod services;
pub mod stations;
pub mod utils;
pub mod workflow;

// Re-export 公共类型
pub use core::{Config, StationConfig, WorkflowConfig};
pub use escalation::EscalationMonitor;
pub use message::{MessageBus, RealtimeNotifier};
pub use orders::{OrderStorage, OrderStore};
pub use workflow::{Resource, ValidationError, WorkflowError, WorkflowManager, WorkflowResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

pub fn print_banner() {
    println!(
        r#"
    __ __ _ __       __
   / //_/(_) /______/ /_  ___  ____
  / ,<  / / __/ ___/ __ \/ _ \/ __ \
 / /| |/ / /_/ /__/ / / /  __/ / / /
/_/ |_/_/\__/\___/_/ /_/\___/_/ /_/
    "#
    );
}
