//! Common types shared between the kiosk tasks
//!
//! Messages carried by the mailboxes, the capacity error taxonomy and the
//! application version.

use core::fmt;

/// Display update request posted by the entry, exit and reset tasks
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayUpdate {
    /// Occupancy read by the producer while it held the counter lock
    pub occupancy: u8,
    /// An entry was rejected because every slot is taken
    pub overflow: bool,
    /// The update was produced by the reset sequence
    pub reset_origin: bool,
}

impl DisplayUpdate {
    /// Occupancy went up or down by one
    pub const fn occupancy_changed(occupancy: u8) -> Self {
        Self {
            occupancy,
            overflow: false,
            reset_origin: false,
        }
    }

    /// Entry attempted while full
    pub const fn capacity_exceeded(occupancy: u8) -> Self {
        Self {
            occupancy,
            overflow: true,
            reset_origin: false,
        }
    }

    /// Screen refresh that completes a reset
    pub const fn after_reset() -> Self {
        Self {
            occupancy: 0,
            overflow: false,
            reset_origin: true,
        }
    }
}

/// Number of beeps the buzzer task should play
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BeepRequest {
    pub count: u8,
}

impl BeepRequest {
    pub const fn new(count: u8) -> Self {
        Self { count }
    }
}

/// Errors from the capacity gate. Both are recovered locally by the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GateError {
    /// Every slot is already taken
    CapacityExceeded,
    /// No slot is taken
    NothingToRelease,
}

impl fmt::Display for GateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateError::CapacityExceeded => f.write_str("capacity exceeded"),
            GateError::NothingToRelease => f.write_str("nothing to release"),
        }
    }
}

/// Current application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
