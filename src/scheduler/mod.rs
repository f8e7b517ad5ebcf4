/*!
 * Scheduler Module
 * Policy selection, dispatch and statistics
 */

mod atomic_stats;
mod dispatch;
mod policies;
pub mod policy;

// Re-export public API
pub use atomic_stats::{AtomicSchedulerStats, SchedulerStats};
pub use policy::{SchedulingPolicy, Selection};
