//! # Matriz Cache
//!
//! 生產指標緩存與髒標記模組

pub mod dirty_tracking;
pub mod memo;

// Re-export 主要類型
pub use dirty_tracking::DirtyTracker;
pub use memo::{CacheStats, MetricsCache};
