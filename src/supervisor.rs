//! Application supervisor and monitoring
//!
//! Prints the startup banner and a periodic uptime/occupancy heartbeat.

use embedded_hal_async::delay::DelayNs;

use crate::config::*;
use crate::types::APP_VERSION;
use crate::Kiosk;

/// Application supervisor responsible for monitoring and lifecycle reporting
pub struct Supervisor<'a> {
    kiosk: &'a Kiosk,
    uptime_seconds: u32,
    last_heartbeat: u32,
}

impl<'a> Supervisor<'a> {
    pub fn new(kiosk: &'a Kiosk) -> Self {
        Self {
            kiosk,
            uptime_seconds: 0,
            last_heartbeat: 0,
        }
    }

    /// Print application startup banner with the pin map
    pub fn print_startup_banner(&self) {
        info!("========================================");
        info!("Slotkeeper v{}", APP_VERSION);
        info!("Service slot counter kiosk");
        info!("========================================");
        info!("Hardware: RP2040 (Raspberry Pi Pico)");
        info!("Capacity: {} slots", MAX_OCCUPANCY);
        info!(
            "Buttons: entry=GP{} exit=GP{} reset=GP{}",
            BTN_ENTRY_PIN, BTN_EXIT_PIN, BTN_RESET_PIN
        );
        info!(
            "RGB LED: R=GP{} G=GP{} B=GP{}",
            LED_RED_PIN, LED_GREEN_PIN, LED_BLUE_PIN
        );
        info!("Buzzer: GP{}", BUZZER_PIN);
        info!(
            "Display: SSD1306 {}x{} on I2C SDA=GP{} SCL=GP{} addr=0x{:02X}",
            DISPLAY_WIDTH, DISPLAY_HEIGHT, DISPLAY_SDA_PIN, DISPLAY_SCL_PIN, DISPLAY_I2C_ADDR
        );
        info!("========================================");
    }

    /// Account for `seconds` of elapsed time. Returns true when a status
    /// report was due and has been printed.
    pub async fn tick(&mut self, seconds: u32) -> bool {
        self.uptime_seconds += seconds;

        if self.uptime_seconds - self.last_heartbeat < STATUS_INTERVAL_SECS {
            return false;
        }

        self.print_status().await;
        self.last_heartbeat = self.uptime_seconds;
        true
    }

    /// Run the main supervisor loop
    pub async fn run<D: DelayNs>(&mut self, mut delay: D) -> ! {
        info!("Application supervisor started");

        loop {
            delay.delay_ms(SUPERVISOR_TICK_SECS * 1000).await;
            self.tick(SUPERVISOR_TICK_SECS).await;
        }
    }

    async fn print_status(&self) {
        let minutes = self.uptime_seconds / 60;
        let hours = minutes / 60;
        let remaining_minutes = minutes % 60;
        let occupancy = self.kiosk.counter.occupancy().await;
        let resetting = self.kiosk.mode.is_resetting();

        if hours > 0 {
            info!(
                "Status: Uptime {}h{}m, occupancy {}/{}, resetting={}",
                hours, remaining_minutes, occupancy, MAX_OCCUPANCY, resetting
            );
        } else {
            info!(
                "Status: Uptime {}m, occupancy {}/{}, resetting={}",
                minutes, occupancy, MAX_OCCUPANCY, resetting
            );
        }
    }

    /// Get current uptime in seconds
    pub fn uptime(&self) -> u32 {
        self.uptime_seconds
    }
}
