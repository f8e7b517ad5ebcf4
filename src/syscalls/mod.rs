/*!
 * Syscalls Module
 * Child wait and reap
 */

mod wait;

// Re-export public API
pub use wait::Reaped;
