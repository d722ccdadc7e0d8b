//! Shared kiosk state
//!
//! One [`Kiosk`] value owns everything the tasks share. The firmware keeps
//! it in a `static`; tests build their own.

use crate::channels::{BuzzerMailbox, DisplayMailbox, WakeSignal};
use crate::config::MAX_OCCUPANCY;
use crate::counter::SharedCounter;
use crate::mode::ProgramMode;
use crate::reset::ResetLine;

pub struct Kiosk {
    /// Occupancy count and capacity gate, behind the counter lock
    pub counter: SharedCounter,
    /// Screen refresh requests, posted while holding the counter lock
    pub display: DisplayMailbox,
    /// Beep requests, posted while holding the counter lock
    pub buzzer: BuzzerMailbox,
    /// Wakes the LED indicator task
    pub led_refresh: WakeSignal,
    /// Wakes the reset task
    pub reset_pending: WakeSignal,
    pub mode: ProgramMode,
}

impl Kiosk {
    pub const fn new() -> Self {
        Self::with_capacity(MAX_OCCUPANCY)
    }

    pub const fn with_capacity(capacity: u8) -> Self {
        Self {
            counter: SharedCounter::new(capacity),
            display: DisplayMailbox::new(),
            buzzer: BuzzerMailbox::new(),
            led_refresh: WakeSignal::new(),
            reset_pending: WakeSignal::new(),
            mode: ProgramMode::new(),
        }
    }

    /// The narrow handle handed to the reset interrupt path.
    pub fn reset_line(&self) -> ResetLine<'_> {
        ResetLine::new(&self.mode, &self.reset_pending)
    }
}

impl Default for Kiosk {
    fn default() -> Self {
        Self::new()
    }
}
