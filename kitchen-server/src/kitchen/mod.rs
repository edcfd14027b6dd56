//! Kitchen views: live queue and statistics (computed fresh on every call)

pub mod queue;
pub mod stats;

pub use queue::{build_queue, order_detail, queue_entry};
pub use stats::compute_stats;
