/*!
 * Process Module
 * Process table, descriptors and lifecycle operations
 */

mod lifecycle;
pub mod table;
pub mod types;

// Re-export for convenience
pub use table::ProcessTable;
pub use types::{Process, ProcessInfo, ProcessState};
