/*!
 * Semaphore Table
 * Fixed-size table of counting semaphores
 */

use super::types::Semaphore;
use crate::core::errors::{PmError, PmResult};
use crate::core::types::{SemId, SemKey};

#[derive(Debug, Clone)]
pub struct SemaphoreTable {
    entries: Vec<Semaphore>,
}

impl SemaphoreTable {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: vec![Semaphore::default(); capacity],
        }
    }

    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    /// Valid entry registered under `key`
    pub fn lookup(&self, key: SemKey) -> Option<SemId> {
        self.entries.iter().position(|s| s.valid && s.key == key)
    }

    /// Claim the first invalid entry for `key`, counter zero
    pub fn allocate(&mut self, key: SemKey) -> Option<SemId> {
        let id = self.entries.iter().position(|s| !s.valid)?;
        self.entries[id] = Semaphore {
            valid: true,
            key,
            counter: 0,
        };
        Some(id)
    }

    pub fn get(&self, id: SemId) -> PmResult<&Semaphore> {
        self.entries
            .get(id)
            .filter(|s| s.valid)
            .ok_or_else(|| PmError::invalid(format!("semaphore {}", id)))
    }

    pub fn get_mut(&mut self, id: SemId) -> PmResult<&mut Semaphore> {
        self.entries
            .get_mut(id)
            .filter(|s| s.valid)
            .ok_or_else(|| PmError::invalid(format!("semaphore {}", id)))
    }

    pub fn invalidate(&mut self, id: SemId) {
        if let Some(entry) = self.entries.get_mut(id) {
            entry.valid = false;
        }
    }
}
