//! The export trigger's enabled state.
//!
//! Acquiring a `BusyGuard` disables the control; dropping the guard re-enables it,
//! whether the export succeeded, failed or the task unwound.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug)]
pub struct ExportControl {
    busy: AtomicBool,
}

impl Default for ExportControl {
    fn default() -> Self {
        Self::new()
    }
}

impl ExportControl {
    pub fn new() -> Self {
        Self {
            busy: AtomicBool::new(false),
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.busy.load(Ordering::Acquire)
    }

    /// Disables the control. `None` if it is already disabled by an export in flight.
    pub fn try_disable(self: &Arc<Self>) -> Option<BusyGuard> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyGuard {
                control: Arc::clone(self),
            })
    }
}

/// Held for the whole duration of one export.
#[derive(Debug)]
pub struct BusyGuard {
    control: Arc<ExportControl>,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.control.busy.store(false, Ordering::Release);
    }
}
