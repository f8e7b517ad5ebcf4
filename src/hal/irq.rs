/*!
 * Interrupt Masking
 * Nest-safe RAII guard over the raw interrupt line
 */

use super::InterruptControl;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Nesting-aware interrupt mask
///
/// Only the outermost guard touches the line: the first `mask()` disables
/// interrupts and the drop of the last live guard enables them again.
pub struct IrqMask {
    line: Arc<dyn InterruptControl>,
    depth: AtomicUsize,
}

impl IrqMask {
    pub fn new(line: Arc<dyn InterruptControl>) -> Self {
        Self {
            line,
            depth: AtomicUsize::new(0),
        }
    }

    /// Enter a critical section
    #[must_use = "interrupts are unmasked again as soon as the guard is dropped"]
    pub fn mask(&self) -> IrqGuard<'_> {
        if self.depth.fetch_add(1, Ordering::AcqRel) == 0 {
            self.line.disable();
        }
        IrqGuard { mask: self }
    }

    /// Current nesting depth
    pub fn depth(&self) -> usize {
        self.depth.load(Ordering::Acquire)
    }
}

/// Critical section marker; interrupts stay masked while any guard lives
pub struct IrqGuard<'a> {
    mask: &'a IrqMask,
}

impl Drop for IrqGuard<'_> {
    fn drop(&mut self) {
        if self.mask.depth.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.mask.line.enable();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::InterruptLine;

    #[test]
    fn test_nested_guards_unmask_once() {
        let line = Arc::new(InterruptLine::new());
        let mask = IrqMask::new(line.clone());

        {
            let _outer = mask.mask();
            assert!(line.is_masked());
            {
                let _inner = mask.mask();
                assert_eq!(mask.depth(), 2);
            }
            assert!(line.is_masked(), "inner guard must not unmask");
        }

        assert!(!line.is_masked());
        assert_eq!(mask.depth(), 0);
        assert_eq!(line.disable_count(), 1);
    }
}
