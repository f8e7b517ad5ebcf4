/*!
 * Sync Module
 * Wait chains and the sleep/wakeup primitive
 */

mod chain;
mod sleep;

pub use chain::{ChainId, WaitChains};
