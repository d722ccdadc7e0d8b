//! RGB LED occupancy indicator
//!
//! Blue while empty, green while there is room, yellow (red + green) with
//! one slot left, red when full.

use embedded_hal::digital::{OutputPin, PinState};
use embedded_hal_async::delay::DelayNs;

use crate::config::LED_HOLD_MS;
use crate::Kiosk;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IndicatorColor {
    Blue,
    Green,
    Yellow,
    Red,
}

/// On/off state of each LED channel
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RgbLevels {
    pub red: bool,
    pub green: bool,
    pub blue: bool,
}

impl IndicatorColor {
    /// Colour for `occupancy` out of `capacity` slots.
    pub const fn for_occupancy(occupancy: u8, capacity: u8) -> Self {
        match occupancy {
            0 => IndicatorColor::Blue,
            n if n >= capacity => IndicatorColor::Red,
            n if n == capacity - 1 => IndicatorColor::Yellow,
            _ => IndicatorColor::Green,
        }
    }

    pub const fn levels(self) -> RgbLevels {
        let (red, green, blue) = match self {
            IndicatorColor::Blue => (false, false, true),
            IndicatorColor::Green => (false, true, false),
            IndicatorColor::Yellow => (true, true, false),
            IndicatorColor::Red => (true, false, false),
        };
        RgbLevels { red, green, blue }
    }
}

/// Three independent LED outputs
pub struct RgbLed<R, G, B> {
    red: R,
    green: G,
    blue: B,
}

impl<R: OutputPin, G: OutputPin, B: OutputPin> RgbLed<R, G, B> {
    pub fn new(red: R, green: G, blue: B) -> Self {
        Self { red, green, blue }
    }

    pub fn show(&mut self, color: IndicatorColor) {
        let levels = color.levels();
        let ok = self.red.set_state(PinState::from(levels.red)).is_ok()
            & self.green.set_state(PinState::from(levels.green)).is_ok()
            & self.blue.set_state(PinState::from(levels.blue)).is_ok();
        if !ok {
            warn!("Failed to drive LED for {}", color);
        }
    }
}

// ===================================================================
// LED Task Implementation
// ===================================================================

pub struct LedIndicatorTask<'a, R, G, B, D> {
    kiosk: &'a Kiosk,
    led: RgbLed<R, G, B>,
    delay: D,
}

impl<'a, R, G, B, D> LedIndicatorTask<'a, R, G, B, D>
where
    R: OutputPin,
    G: OutputPin,
    B: OutputPin,
    D: DelayNs,
{
    /// Takes over the LED and lights it blue, the empty-kiosk colour.
    pub fn new(kiosk: &'a Kiosk, mut led: RgbLed<R, G, B>, delay: D) -> Self {
        led.show(IndicatorColor::Blue);
        Self { kiosk, led, delay }
    }

    /// Read the occupancy under the counter lock and show its colour.
    pub async fn refresh(&mut self) -> IndicatorColor {
        let color = self
            .kiosk
            .counter
            .with_lock(|ledger| IndicatorColor::for_occupancy(ledger.occupancy(), ledger.capacity()))
            .await;

        self.led.show(color);
        trace!("LED shows {}", color);
        color
    }

    pub async fn run(mut self) -> ! {
        info!("LED indicator task started");

        loop {
            self.kiosk.led_refresh.await_and_clear().await;
            self.refresh().await;
            self.delay.delay_ms(LED_HOLD_MS).await;
        }
    }
}
