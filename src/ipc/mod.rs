/*!
 * IPC Module
 * Counting semaphores with blocking down operations
 */

mod operations;
pub mod table;
pub mod types;

// Re-export for convenience
pub use table::SemaphoreTable;
pub use types::{SemCommand, Semaphore};
