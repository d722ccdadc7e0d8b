//! Shared occupancy counter
//!
//! The occupancy count and the capacity gate live together in a [`Ledger`]
//! behind a single async mutex. Every mutation goes through the ledger, so
//! holding the lock is the only way to change the count or move a permit.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::{Mutex, MutexGuard};

use crate::gate::CapacityGate;
use crate::types::GateError;

/// Occupancy count plus the gate that bounds it.
///
/// Invariant: `occupancy == gate.outstanding()` and `occupancy <= capacity`.
pub struct Ledger {
    occupancy: u8,
    gate: CapacityGate,
}

impl Ledger {
    pub const fn new(capacity: u8) -> Self {
        Self {
            occupancy: 0,
            gate: CapacityGate::new(capacity),
        }
    }

    pub fn occupancy(&self) -> u8 {
        self.occupancy
    }

    pub fn capacity(&self) -> u8 {
        self.gate.capacity()
    }

    pub fn free(&self) -> u8 {
        self.capacity() - self.occupancy
    }

    /// Occupy one slot, returning the new occupancy.
    pub fn admit(&mut self) -> Result<u8, GateError> {
        self.gate.try_acquire()?;
        self.occupancy += 1;
        debug_assert_eq!(self.occupancy, self.gate.outstanding());
        Ok(self.occupancy)
    }

    /// Free one slot, returning the new occupancy.
    pub fn discharge(&mut self) -> Result<u8, GateError> {
        self.gate.try_release()?;
        self.occupancy -= 1;
        debug_assert_eq!(self.occupancy, self.gate.outstanding());
        Ok(self.occupancy)
    }

    /// Empty the kiosk. Returns the number of permits that were released.
    pub fn clear(&mut self) -> u8 {
        let released = self.gate.drain();
        self.occupancy = 0;
        released
    }

    #[cfg(test)]
    pub(crate) fn outstanding_permits(&self) -> u8 {
        self.gate.outstanding()
    }
}

pub type LedgerGuard<'a> = MutexGuard<'a, CriticalSectionRawMutex, Ledger>;

/// The authoritative occupancy state and its lock.
pub struct SharedCounter {
    ledger: Mutex<CriticalSectionRawMutex, Ledger>,
    capacity: u8,
}

impl SharedCounter {
    pub const fn new(capacity: u8) -> Self {
        Self {
            ledger: Mutex::new(Ledger::new(capacity)),
            capacity,
        }
    }

    /// Slot count. Fixed at construction, readable without the lock.
    pub fn capacity(&self) -> u8 {
        self.capacity
    }

    /// Lock the ledger for a critical section that needs to await, such as
    /// posting to a mailbox. The lock is released when the guard drops.
    pub async fn lock(&self) -> LedgerGuard<'_> {
        self.ledger.lock().await
    }

    /// Run `f` with exclusive access to the ledger.
    pub async fn with_lock<R>(&self, f: impl FnOnce(&mut Ledger) -> R) -> R {
        let mut ledger = self.ledger.lock().await;
        f(&mut ledger)
    }

    /// Current occupancy, waiting for the lock.
    pub async fn occupancy(&self) -> u8 {
        self.with_lock(|ledger| ledger.occupancy()).await
    }

    /// Whether some task is inside a critical section right now.
    #[cfg(test)]
    pub(crate) fn is_locked(&self) -> bool {
        self.ledger.try_lock().is_err()
    }
}
