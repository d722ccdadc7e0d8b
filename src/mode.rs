//! Program mode flag
//!
//! Set by the reset edge, cleared by the display task once it has drawn the
//! screen that completes the reset. Polling tasks read it without taking the
//! counter lock; a stale read only costs one extra poll cycle.

use portable_atomic::{AtomicBool, Ordering};

pub struct ProgramMode {
    resetting: AtomicBool,
}

impl ProgramMode {
    pub const fn new() -> Self {
        Self {
            resetting: AtomicBool::new(false),
        }
    }

    pub fn is_resetting(&self) -> bool {
        self.resetting.load(Ordering::Acquire)
    }

    pub fn enter_reset(&self) {
        self.resetting.store(true, Ordering::Release);
    }

    /// Leave reset mode. Returns whether the kiosk was resetting.
    pub fn finish_reset(&self) -> bool {
        self.resetting.swap(false, Ordering::AcqRel)
    }
}

impl Default for ProgramMode {
    fn default() -> Self {
        Self::new()
    }
}
