//! Priority tiers and ETA
//!
//! Both are recomputed on every read and never persisted.

use shared::models::{Order, Priority};
use shared::util::{MINUTE_MILLIS, minutes_between};

/// Fixed ETA increment per active item line
pub const PER_ITEM_PREP_MINUTES: i64 = 2;

pub const MEDIUM_AFTER_MINUTES: i64 = 10;
pub const HIGH_AFTER_MINUTES: i64 = 20;
pub const URGENT_AFTER_MINUTES: i64 = 30;

/// Tier for an order age in whole minutes
pub fn priority_for_minutes(minutes_elapsed: i64) -> Priority {
    if minutes_elapsed > URGENT_AFTER_MINUTES {
        Priority::Urgent
    } else if minutes_elapsed > HIGH_AFTER_MINUTES {
        Priority::High
    } else if minutes_elapsed > MEDIUM_AFTER_MINUTES {
        Priority::Medium
    } else {
        Priority::Low
    }
}

pub fn minutes_elapsed(order: &Order, now: i64) -> i64 {
    minutes_between(order.ordered_at, now)
}

pub fn priority(order: &Order, now: i64) -> Priority {
    priority_for_minutes(minutes_elapsed(order, now))
}

/// `ordered_at + base_prep + 2 × active item lines` (epoch millis)
pub fn eta(order: &Order, base_prep_minutes: u32) -> i64 {
    let minutes = i64::from(base_prep_minutes) + PER_ITEM_PREP_MINUTES * order.item_count() as i64;
    order.ordered_at + minutes * MINUTE_MILLIS
}
