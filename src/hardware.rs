//! Hardware abstraction and initialization
//!
//! This module owns everything RP2040 specific: it turns the peripherals
//! into drivers, binds them to the generic kiosk tasks and spawns those tasks
//! on the executor of their priority tier.

use embassy_executor::{SendSpawner, SpawnError, Spawner};
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::I2C1;
use embassy_rp::pwm::{Config as PwmConfig, Pwm, PwmOutput};
use embassy_rp::Peripherals;
use embassy_time::Delay;
use fixed::FixedU16;
use ssd1306::mode::BufferedGraphicsMode;
use ssd1306::prelude::*;
use ssd1306::{I2CDisplayInterface, Ssd1306};

use crate::buttons::{ButtonTask, CounterButton};
use crate::buzzer::{Buzzer, BuzzerTask};
use crate::config::*;
use crate::display::{DisplayTask, Panel};
use crate::led::{LedIndicatorTask, RgbLed};
use crate::reset::{watch_reset_edge, ResetEdge, ResetTask};
use crate::supervisor::Supervisor;
use crate::Kiosk;

/// The kiosk state shared by every task
pub static KIOSK: Kiosk = Kiosk::new();

/// SSD1306 on I2C1 in buffered graphics mode
pub type OledPanel = Ssd1306<
    I2CInterface<I2c<'static, I2C1, i2c::Blocking>>,
    DisplaySize128x64,
    BufferedGraphicsMode<DisplaySize128x64>,
>;

impl Panel for OledPanel {
    fn flush(&mut self) -> Result<(), Self::Error> {
        Ssd1306::flush(self)
    }
}

// ===================================================================
// Board Drivers
// ===================================================================

/// Drivers for the reset tier (highest priority)
pub struct ResetHardware {
    pub button: Input<'static>,
}

/// Drivers for the entry/exit tier
pub struct ButtonHardware {
    pub entry: Input<'static>,
    pub exit: Input<'static>,
}

/// Drivers for the background tier (display, LED, buzzer)
pub struct OutputHardware {
    pub panel: OledPanel,
    pub led_red: Output<'static>,
    pub led_green: Output<'static>,
    pub led_blue: Output<'static>,
    pub buzzer: PwmOutput<'static>,
}

pub struct Board {
    pub reset: ResetHardware,
    pub buttons: ButtonHardware,
    pub outputs: OutputHardware,
}

/// Create all drivers for the kiosk board
pub fn create_board(p: Peripherals) -> Board {
    info!("Initializing kiosk hardware");

    // Buttons are active-low with internal pull-ups
    let reset = ResetHardware {
        button: Input::new(p.PIN_22, Pull::Up),
    };
    let buttons = ButtonHardware {
        entry: Input::new(p.PIN_5, Pull::Up),
        exit: Input::new(p.PIN_6, Pull::Up),
    };

    // OLED on I2C1: SCL = GP15, SDA = GP14
    let mut i2c_config = i2c::Config::default();
    i2c_config.frequency = DISPLAY_I2C_FREQUENCY;
    let i2c = I2c::new_blocking(p.I2C1, p.PIN_15, p.PIN_14, i2c_config);
    let interface = I2CDisplayInterface::new_custom_address(i2c, DISPLAY_I2C_ADDR);
    let mut panel = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
        .into_buffered_graphics_mode();
    if panel.init().is_err() {
        error!("SSD1306 initialization failed");
    }

    // Buzzer on GP21 = PWM slice 2, channel B
    let mut pwm_config = PwmConfig::default();
    pwm_config.top = BUZZER_PWM_TOP;
    pwm_config.divider = FixedU16::from_num(BUZZER_PWM_DIVIDER);
    let (_, buzzer) = Pwm::new_output_b(p.PWM_SLICE2, p.PIN_21, pwm_config).split();
    let buzzer = defmt::unwrap!(buzzer);

    let outputs = OutputHardware {
        panel,
        led_red: Output::new(p.PIN_13, Level::Low),
        led_green: Output::new(p.PIN_11, Level::Low),
        led_blue: Output::new(p.PIN_12, Level::Low),
        buzzer,
    };

    info!("Kiosk hardware ready");

    Board {
        reset,
        buttons,
        outputs,
    }
}

// ===================================================================
// Task Spawning
// ===================================================================

/// Spawn the reset task and the reset edge watcher
pub fn spawn_reset_tasks(spawner: &SendSpawner, hw: ResetHardware) -> Result<(), SpawnError> {
    spawner.spawn(reset_task())?;
    spawner.spawn(reset_edge_task(hw.button))?;
    Ok(())
}

/// Spawn the entry and exit polling tasks
pub fn spawn_button_tasks(spawner: &SendSpawner, hw: ButtonHardware) -> Result<(), SpawnError> {
    spawner.spawn(counter_button_task(CounterButton::Entry, hw.entry))?;
    spawner.spawn(counter_button_task(CounterButton::Exit, hw.exit))?;
    Ok(())
}

/// Spawn the display, LED, buzzer and supervisor tasks
pub fn spawn_output_tasks(spawner: &Spawner, hw: OutputHardware) -> Result<(), SpawnError> {
    spawner.spawn(display_task(hw.panel))?;
    spawner.spawn(led_task(hw.led_red, hw.led_green, hw.led_blue))?;
    spawner.spawn(buzzer_task(hw.buzzer))?;
    spawner.spawn(supervisor_task())?;
    Ok(())
}

// ===================================================================
// Task Implementations
// ===================================================================

#[embassy_executor::task]
async fn reset_task() {
    ResetTask::new(&KIOSK).run().await
}

#[embassy_executor::task]
async fn reset_edge_task(button: Input<'static>) {
    watch_reset_edge(button, ResetEdge::new(KIOSK.reset_line())).await
}

#[embassy_executor::task(pool_size = 2)]
async fn counter_button_task(role: CounterButton, button: Input<'static>) {
    ButtonTask::new(&KIOSK, role, button, Delay).run().await
}

#[embassy_executor::task]
async fn display_task(panel: OledPanel) {
    DisplayTask::new(&KIOSK, panel).run().await
}

#[embassy_executor::task]
async fn led_task(red: Output<'static>, green: Output<'static>, blue: Output<'static>) {
    LedIndicatorTask::new(&KIOSK, RgbLed::new(red, green, blue), Delay)
        .run()
        .await
}

#[embassy_executor::task]
async fn buzzer_task(pwm: PwmOutput<'static>) {
    BuzzerTask::new(&KIOSK, Buzzer::new(pwm), Delay).run().await
}

#[embassy_executor::task]
async fn supervisor_task() {
    Supervisor::new(&KIOSK).run(Delay).await
}
