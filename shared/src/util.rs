/// Milliseconds in one minute
pub const MINUTE_MILLIS: i64 = 60_000;

/// Milliseconds in one day
pub const DAY_MILLIS: i64 = 24 * 60 * MINUTE_MILLIS;

/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Whole minutes elapsed between two millisecond timestamps (never negative)
pub fn minutes_between(from_millis: i64, to_millis: i64) -> i64 {
    ((to_millis - from_millis) / MINUTE_MILLIS).max(0)
}

/// Generate a new random identifier for orders and items
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
