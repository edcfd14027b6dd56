use std::path::PathBuf;

use shared::models::StationId;

/// 服务器配置 - kitchen-server 的所有配置项
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | /var/lib/kitchen-flow | 工作目录 (数据库、日志) |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | (未设置) | 设置后按天滚动写日志文件 |
/// | KITCHEN_ID | main | 默认厨房 |
/// | BASE_PREP_MINUTES | 20 | ETA 基础准备时间 |
/// | REFUND_WINDOW_DAYS | 30 | 退款窗口 |
/// | WAIT_PER_ORDER_MINUTES | 15 | 队列等待估算 (每单) |
/// | ESCALATION_INTERVAL_SECS | 60 | 优先级升级扫描周期 |
/// | EVENT_CHANNEL_CAPACITY | 1024 | 广播通道容量 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/kitchen BASE_PREP_MINUTES=25 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录
    pub work_dir: String,
    pub log_level: String,
    pub log_dir: Option<String>,
    pub kitchen_id: String,
    pub base_prep_minutes: u32,
    pub refund_window_days: u32,
    pub wait_per_order_minutes: u32,
    pub escalation_interval_secs: u64,
    pub event_channel_capacity: usize,
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/kitchen-flow".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok(),
            kitchen_id: std::env::var("KITCHEN_ID").unwrap_or_else(|_| "main".into()),
            base_prep_minutes: env_parse("BASE_PREP_MINUTES", DEFAULT_BASE_PREP_MINUTES),
            refund_window_days: env_parse("REFUND_WINDOW_DAYS", DEFAULT_REFUND_WINDOW_DAYS),
            wait_per_order_minutes: env_parse(
                "WAIT_PER_ORDER_MINUTES",
                DEFAULT_WAIT_PER_ORDER_MINUTES,
            ),
            escalation_interval_secs: env_parse("ESCALATION_INTERVAL_SECS", 60),
            event_channel_capacity: env_parse("EVENT_CHANNEL_CAPACITY", 1024),
        }
    }

    /// Path of the redb order database
    pub fn db_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("orders.redb")
    }

    /// Workflow parameters with the default station table
    pub fn workflow(&self) -> WorkflowConfig {
        WorkflowConfig {
            base_prep_minutes: self.base_prep_minutes,
            refund_window_days: self.refund_window_days,
            wait_per_order_minutes: self.wait_per_order_minutes,
            default_kitchen_id: self.kitchen_id.clone(),
            ..WorkflowConfig::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

pub const DEFAULT_BASE_PREP_MINUTES: u32 = 20;
pub const DEFAULT_REFUND_WINDOW_DAYS: u32 = 30;
pub const DEFAULT_WAIT_PER_ORDER_MINUTES: u32 = 15;

/// One configured station and its keyword rules
#[derive(Debug, Clone, PartialEq)]
pub struct StationConfig {
    pub id: StationId,
    pub name: String,
    pub capacity: u32,
    /// Lower-case substrings matched against product and category names
    pub keywords: Vec<String>,
}

impl StationConfig {
    pub fn new(id: &str, name: &str, capacity: u32, keywords: &[&str]) -> Self {
        Self {
            id: StationId::from(id),
            name: name.to_string(),
            capacity,
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }
}

/// Orchestrator parameters, passed into `WorkflowManager` at construction
///
/// Station order is the priority order used when a single station must be
/// picked for an item.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowConfig {
    pub base_prep_minutes: u32,
    pub refund_window_days: u32,
    pub wait_per_order_minutes: u32,
    /// Kitchen topic used for station-level events
    pub default_kitchen_id: String,
    pub stations: Vec<StationConfig>,
}

impl WorkflowConfig {
    pub fn station(&self, id: &StationId) -> Option<&StationConfig> {
        self.stations.iter().find(|s| &s.id == id)
    }
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            base_prep_minutes: DEFAULT_BASE_PREP_MINUTES,
            refund_window_days: DEFAULT_REFUND_WINDOW_DAYS,
            wait_per_order_minutes: DEFAULT_WAIT_PER_ORDER_MINUTES,
            default_kitchen_id: "main".to_string(),
            stations: default_stations(),
        }
    }
}

/// Default station table (Spanish menu keywords)
pub fn default_stations() -> Vec<StationConfig> {
    vec![
        StationConfig::new(
            "grill",
            "Parrilla",
            8,
            &["hamburguesa", "pollo", "carne", "pescado", "grill", "parrilla"],
        ),
        StationConfig::new(
            "salad",
            "Ensaladas",
            6,
            &["ensalada", "salad", "verdura", "vegetal"],
        ),
        StationConfig::new("pizza", "Pizzas", 6, &["pizza", "calzone", "focaccia"]),
        StationConfig::new(
            "dessert",
            "Postres",
            6,
            &["postre", "helado", "pastel", "tarta", "flan", "dessert"],
        ),
        StationConfig::new(
            "beverage",
            "Bebidas",
            12,
            &[
                "bebida", "jugo", "zumo", "refresco", "agua", "cerveza", "vino", "cafe", "café",
                "limonada", "batido",
            ],
        ),
    ]
}
