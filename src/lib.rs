//! Slotkeeper - Service Slot Counter Kiosk for RP2040
//!
//! This library provides the firmware for a queue-management kiosk that
//! tracks how many of a fixed number of service slots are occupied,
//! using Embassy async tasks on RP2040.
//!
//! ## Peripherals
//! - Entry / exit push buttons (active-low, polled)
//! - Reset button (falling edge, interrupt driven)
//! - SSD1306 128x64 OLED status screen
//! - RGB LED occupancy indicator
//! - PWM buzzer
//!
//! ## Architecture
//! - **Kiosk**: one owning aggregate for the counter, mailboxes, signals and program mode
//! - **Priorities**: reset > entry/exit > display/LED/buzzer, one executor per tier
//! - **Hardware agnostic core**: tasks are generic over `embedded-hal` and
//!   `embedded-graphics` traits; only [`hardware`] knows about RP2040 types

#![cfg_attr(not(test), no_std)]

// This mod MUST go first, so that the others see its macros.
mod fmt;

pub mod buttons;
pub mod buzzer;
pub mod channels;
pub mod config;
pub mod counter;
pub mod display;
pub mod gate;
pub mod kiosk;
pub mod led;
pub mod mode;
pub mod reset;
pub mod supervisor;
pub mod types;

#[cfg(feature = "rp2040")]
pub mod hardware;

#[cfg(test)]
mod testing;

pub use kiosk::Kiosk;
