//! Capacity gate
//!
//! A fixed pool of slot permits. Taking a permit marks one slot occupied,
//! returning it frees the slot. Both directions fail immediately instead of
//! waiting, so a full kiosk rejects an entry and an empty one ignores an exit.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::semaphore::{GreedySemaphore, Semaphore};

use crate::types::GateError;

type SlotSemaphore = GreedySemaphore<CriticalSectionRawMutex>;

/// Counting resource bounding concurrent occupancy.
///
/// Starts with every permit available (no slot outstanding). The permit
/// pool enforces the upper bound on its own; `outstanding` tracks how many
/// permits have been handed out so a release can never push the pool past
/// its capacity.
pub struct CapacityGate {
    permits: SlotSemaphore,
    outstanding: u8,
    capacity: u8,
}

impl CapacityGate {
    pub const fn new(capacity: u8) -> Self {
        Self {
            permits: SlotSemaphore::new(capacity as usize),
            outstanding: 0,
            capacity,
        }
    }

    /// Take one slot. Fails with [`GateError::CapacityExceeded`] when full.
    pub fn try_acquire(&mut self) -> Result<(), GateError> {
        if self.outstanding >= self.capacity {
            return Err(GateError::CapacityExceeded);
        }

        match self.permits.try_acquire(1) {
            Some(permit) => {
                // The slot stays taken until `try_release`, not until the
                // releaser goes out of scope.
                permit.disarm();
                self.outstanding += 1;
                Ok(())
            }
            None => Err(GateError::CapacityExceeded),
        }
    }

    /// Give one slot back. Fails with [`GateError::NothingToRelease`] when empty.
    pub fn try_release(&mut self) -> Result<(), GateError> {
        if self.outstanding == 0 {
            return Err(GateError::NothingToRelease);
        }

        self.permits.release(1);
        self.outstanding -= 1;
        Ok(())
    }

    /// Release every outstanding slot, returning how many were released.
    pub fn drain(&mut self) -> u8 {
        let mut released = 0;
        while self.try_release().is_ok() {
            released += 1;
        }
        released
    }

    pub fn outstanding(&self) -> u8 {
        self.outstanding
    }

    pub fn capacity(&self) -> u8 {
        self.capacity
    }

    #[cfg(test)]
    pub(crate) fn is_full(&self) -> bool {
        self.outstanding >= self.capacity
    }
}
