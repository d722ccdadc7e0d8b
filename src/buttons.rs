//! Entry and exit button handling
//!
//! Both counter buttons are polled every [`BUTTON_POLL_MS`]. A press is
//! accepted when the input is low, the kiosk is not resetting, and the last
//! accepted press on the same input is more than [`BUTTON_DEBOUNCE_MS`] old.
//! Accepted presses update the shared counter and fan out notifications.

use embassy_time::{Duration, Instant};
use embedded_hal::digital::InputPin;
use embedded_hal_async::delay::DelayNs;

use crate::config::*;
use crate::types::{BeepRequest, DisplayUpdate, GateError};
use crate::Kiosk;

// ===================================================================
// Debouncing
// ===================================================================

/// Per-input debounce state. Owned by the task reading the input.
pub struct Debouncer {
    window: Duration,
    last_accepted: Option<Instant>,
}

impl Debouncer {
    pub const fn new(window: Duration) -> Self {
        Self {
            window,
            last_accepted: None,
        }
    }

    /// Decide whether an event at `now` counts. Accepted events restart the
    /// quiet period; rejected ones do not.
    pub fn accept(&mut self, now: Instant) -> bool {
        match self.last_accepted {
            Some(last) if now.saturating_duration_since(last) <= self.window => false,
            _ => {
                self.last_accepted = Some(now);
                true
            }
        }
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(Duration::from_millis(BUTTON_DEBOUNCE_MS))
    }
}

// ===================================================================
// Counter Updates
// ===================================================================

/// Which way a counter button moves the occupancy
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CounterButton {
    Entry,
    Exit,
}

/// Handle an accepted entry press.
///
/// On success the count goes up, the LED is refreshed and the display gets a
/// normal update. When full the count is left alone, the display shows the
/// overflow banner and one beep is requested. Returns the new occupancy.
pub async fn register_entry(kiosk: &Kiosk) -> Result<u8, GateError> {
    let mut ledger = kiosk.counter.lock().await;

    match ledger.admit() {
        Ok(occupancy) => {
            debug!("Entry accepted, occupancy {}/{}", occupancy, ledger.capacity());
            kiosk.led_refresh.raise();
            kiosk
                .display
                .send(DisplayUpdate::occupancy_changed(occupancy))
                .await;
            Ok(occupancy)
        }
        Err(e) => {
            warn!("Entry rejected: {}", e);
            kiosk
                .display
                .send(DisplayUpdate::capacity_exceeded(ledger.occupancy()))
                .await;
            kiosk.buzzer.send(BeepRequest::new(OVERFLOW_BEEPS)).await;
            Err(e)
        }
    }
}

/// Handle an accepted exit press. Does nothing when the kiosk is empty.
pub async fn register_exit(kiosk: &Kiosk) -> Result<u8, GateError> {
    let mut ledger = kiosk.counter.lock().await;

    let occupancy = match ledger.discharge() {
        Ok(occupancy) => occupancy,
        Err(e) => {
            debug!("Exit ignored: {}", e);
            return Err(e);
        }
    };

    debug!("Exit accepted, occupancy {}/{}", occupancy, ledger.capacity());
    kiosk.led_refresh.raise();
    kiosk
        .display
        .send(DisplayUpdate::occupancy_changed(occupancy))
        .await;
    Ok(occupancy)
}

// ===================================================================
// Button Task Implementation
// ===================================================================

pub struct ButtonTask<'a, P, D> {
    kiosk: &'a Kiosk,
    role: CounterButton,
    pin: P,
    delay: D,
    debouncer: Debouncer,
}

impl<'a, P, D> ButtonTask<'a, P, D>
where
    P: InputPin,
    D: DelayNs,
{
    pub fn new(kiosk: &'a Kiosk, role: CounterButton, pin: P, delay: D) -> Self {
        Self {
            kiosk,
            role,
            pin,
            delay,
            debouncer: Debouncer::default(),
        }
    }

    // Read the pin (low = pressed due to pull-up)
    fn is_pressed(&mut self) -> bool {
        match self.pin.is_low() {
            Ok(pressed) => pressed,
            Err(_) => {
                warn!("{} button read failed", self.role);
                false
            }
        }
    }

    /// Sample the button once. Returns true when a press is accepted.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.kiosk.mode.is_resetting() {
            return false;
        }
        if !self.is_pressed() {
            return false;
        }
        self.debouncer.accept(now)
    }

    /// Apply an accepted press to the counter.
    pub async fn press(&self) -> Result<u8, GateError> {
        match self.role {
            CounterButton::Entry => register_entry(self.kiosk).await,
            CounterButton::Exit => register_exit(self.kiosk).await,
        }
    }

    pub async fn run(mut self) -> ! {
        info!("{} button task started", self.role);

        loop {
            if self.poll(Instant::now()) {
                match self.press().await {
                    Ok(occupancy) => trace!("{} press applied, occupancy {}", self.role, occupancy),
                    // Already reported by the register functions
                    Err(_) => {}
                }
            }
            self.delay.delay_ms(BUTTON_POLL_MS).await;
        }
    }
}
