//! Inter-task communication primitives
//!
//! Single-slot mailboxes for display and buzzer requests, and binary wake
//! signals for the LED refresh and the reset sequence. Everything is built on
//! `CriticalSectionRawMutex` because the tasks sharing them run on different
//! executors, one of them at interrupt priority.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use crate::types::{BeepRequest, DisplayUpdate};

/// A mailbox holding at most one pending message.
///
/// `send` waits while the slot is occupied, so a slow consumer throttles its
/// producers instead of losing messages.
pub struct Mailbox<T> {
    slot: Channel<CriticalSectionRawMutex, T, 1>,
}

impl<T> Mailbox<T> {
    pub const fn new() -> Self {
        Self {
            slot: Channel::new(),
        }
    }

    /// Store `message`, waiting for the slot to free up if needed.
    pub async fn send(&self, message: T) {
        self.slot.send(message).await;
    }

    /// Wait for a message and take it out of the slot.
    pub async fn receive(&self) -> T {
        self.slot.receive().await
    }

    /// Take the pending message, if any, without waiting.
    pub fn try_receive(&self) -> Option<T> {
        self.slot.try_receive().ok()
    }

    /// Drop whatever is pending. Returns the number of discarded messages.
    pub fn clear(&self) -> usize {
        let mut discarded = 0;
        while self.slot.try_receive().is_ok() {
            discarded += 1;
        }
        discarded
    }
}

impl<T> Default for Mailbox<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Display updates, latest screen state only
pub type DisplayMailbox = Mailbox<DisplayUpdate>;

/// Beep requests for the buzzer task
pub type BuzzerMailbox = Mailbox<BeepRequest>;

/// Level-triggered wake-up: raising twice before the waiter runs is the same
/// as raising once.
pub struct WakeSignal {
    inner: Signal<CriticalSectionRawMutex, ()>,
}

impl WakeSignal {
    pub const fn new() -> Self {
        Self {
            inner: Signal::new(),
        }
    }

    /// Mark the signal as raised. Never blocks, safe from interrupt context.
    pub fn raise(&self) {
        self.inner.signal(());
    }

    /// Wait until the signal is raised, then clear it.
    pub async fn await_and_clear(&self) {
        self.inner.wait().await;
    }

    pub fn is_raised(&self) -> bool {
        self.inner.signaled()
    }
}

impl Default for WakeSignal {
    fn default() -> Self {
        Self::new()
    }
}
