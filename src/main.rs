//! Slotkeeper - Service Slot Counter Kiosk Firmware
//!
//! Hardware: Raspberry Pi Pico (RP2040) carrier board
//! Display: SSD1306 128x64 OLED on I2C1
//! Inputs: entry (GP5), exit (GP6), reset (GP22) buttons
//! Outputs: RGB LED (GP13/GP11/GP12), PWM buzzer (GP21)
//!
//! Three executors give the tasks their priority tiers:
//! - SWI_IRQ_1 (P2): reset task and reset edge watcher
//! - SWI_IRQ_0 (P3): entry/exit button polling
//! - thread mode: display, LED indicator, buzzer, supervisor

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::{Executor, InterruptExecutor};
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use panic_halt as _;
use defmt_rtt as _; // global logger
use static_cell::StaticCell;

use slotkeeper::hardware::{self, KIOSK};
use slotkeeper::supervisor::Supervisor;

static EXECUTOR_RESET: InterruptExecutor = InterruptExecutor::new();
static EXECUTOR_BUTTONS: InterruptExecutor = InterruptExecutor::new();
static EXECUTOR_BACKGROUND: StaticCell<Executor> = StaticCell::new();

#[interrupt]
unsafe fn SWI_IRQ_1() {
    EXECUTOR_RESET.on_interrupt()
}

#[interrupt]
unsafe fn SWI_IRQ_0() {
    EXECUTOR_BUTTONS.on_interrupt()
}

#[cortex_m_rt::entry]
fn main() -> ! {
    let p = embassy_rp::init(Default::default());

    Supervisor::new(&KIOSK).print_startup_banner();

    let board = hardware::create_board(p);

    // Reset tier
    interrupt::SWI_IRQ_1.set_priority(Priority::P2);
    let spawner = EXECUTOR_RESET.start(interrupt::SWI_IRQ_1);
    unwrap!(hardware::spawn_reset_tasks(&spawner, board.reset));

    // Entry/exit tier
    interrupt::SWI_IRQ_0.set_priority(Priority::P3);
    let spawner = EXECUTOR_BUTTONS.start(interrupt::SWI_IRQ_0);
    unwrap!(hardware::spawn_button_tasks(&spawner, board.buttons));

    info!("Kiosk initialized, waiting for visitors...");

    // Background tier runs in thread mode
    let outputs = board.outputs;
    let executor = EXECUTOR_BACKGROUND.init(Executor::new());
    executor.run(|spawner| {
        unwrap!(hardware::spawn_output_tasks(&spawner, outputs));
    })
}
