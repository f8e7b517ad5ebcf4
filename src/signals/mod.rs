/*!
 * Signals
 * Signal numbers and the pending-signal queue
 */

mod queue;
pub mod types;

pub use queue::SignalQueue;
pub use types::Signal;
