//! Reset path
//!
//! The reset button edge runs at the highest priority and may only do
//! non-blocking work, so it gets a [`ResetLine`] instead of the kiosk: it can
//! flip the program mode and raise the reset signal, nothing else. The
//! [`ResetTask`] then clears the whole kiosk under the counter lock.

use embassy_time::Instant;
use embedded_hal_async::digital::Wait;

use crate::buttons::Debouncer;
use crate::channels::WakeSignal;
use crate::config::RESET_BEEPS;
use crate::mode::ProgramMode;
use crate::types::{BeepRequest, DisplayUpdate};
use crate::Kiosk;

// ===================================================================
// Interrupt Side
// ===================================================================

/// Interrupt-context capability: set reset mode and wake the reset task.
#[derive(Clone, Copy)]
pub struct ResetLine<'a> {
    mode: &'a ProgramMode,
    pending: &'a WakeSignal,
}

impl<'a> ResetLine<'a> {
    pub(crate) fn new(mode: &'a ProgramMode, pending: &'a WakeSignal) -> Self {
        Self { mode, pending }
    }

    /// Start a reset. Never blocks.
    pub fn trigger(&self) {
        self.mode.enter_reset();
        self.pending.raise();
    }
}

/// Falling-edge handler for the reset button.
pub struct ResetEdge<'a> {
    line: ResetLine<'a>,
    debouncer: Debouncer,
}

impl<'a> ResetEdge<'a> {
    pub fn new(line: ResetLine<'a>) -> Self {
        Self {
            line,
            debouncer: Debouncer::default(),
        }
    }

    /// Handle one falling edge seen at `now`. Returns whether a reset was
    /// triggered.
    pub fn on_falling_edge(&mut self, now: Instant) -> bool {
        if !self.debouncer.accept(now) {
            return false;
        }
        self.line.trigger();
        true
    }
}

/// Wait for falling edges on `button` forever, feeding them to `edge`.
pub async fn watch_reset_edge<P: Wait>(mut button: P, mut edge: ResetEdge<'_>) -> ! {
    info!("Reset edge watcher started");

    loop {
        if button.wait_for_falling_edge().await.is_err() {
            error!("Reset button edge wait failed");
            continue;
        }
        if edge.on_falling_edge(Instant::now()) {
            info!("Reset requested");
        }
    }
}

// ===================================================================
// Reset Task Implementation
// ===================================================================

pub struct ResetTask<'a> {
    kiosk: &'a Kiosk,
}

impl<'a> ResetTask<'a> {
    pub fn new(kiosk: &'a Kiosk) -> Self {
        Self { kiosk }
    }

    /// Clear the kiosk: release every slot, zero the count, drop stale
    /// display and buzzer requests, then post the reset screen, an LED
    /// refresh and the reset beeps. Returns how many slots were released.
    pub async fn perform(&self) -> u8 {
        let kiosk = self.kiosk;
        let mut ledger = kiosk.counter.lock().await;

        let released = ledger.clear();

        let stale_updates = kiosk.display.clear();
        let stale_beeps = kiosk.buzzer.clear();
        debug!(
            "Reset dropped {} display and {} buzzer requests",
            stale_updates, stale_beeps
        );

        kiosk.display.send(DisplayUpdate::after_reset()).await;
        kiosk.led_refresh.raise();
        kiosk.buzzer.send(BeepRequest::new(RESET_BEEPS)).await;

        info!("Kiosk reset, {} slots released", released);
        released
    }

    pub async fn run(&self) -> ! {
        info!("Reset task started");

        loop {
            self.kiosk.reset_pending.await_and_clear().await;
            self.perform().await;
        }
    }
}
