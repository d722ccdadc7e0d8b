//! Host-side stand-ins for the board peripherals used by the unit tests.

use core::cell::{Cell, RefCell};
use core::convert::Infallible;
use std::rc::Rc;
use std::vec::Vec;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use embedded_hal::pwm::{self, SetDutyCycle};
use embedded_hal_async::delay::DelayNs;

use crate::config::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use crate::display::Panel;

/// Active-low push button. Clones share the same level.
#[derive(Clone, Default)]
pub struct FakeInput {
    pressed: Rc<Cell<bool>>,
}

impl FakeInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&self) {
        self.pressed.set(true);
    }

    pub fn release(&self) {
        self.pressed.set(false);
    }
}

impl ErrorType for FakeInput {
    type Error = Infallible;
}

impl InputPin for FakeInput {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.pressed.get())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(self.pressed.get())
    }
}

/// Output pin whose level can be inspected through a clone.
#[derive(Clone, Default)]
pub struct FakeOutput {
    high: Rc<Cell<bool>>,
}

impl FakeOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_on(&self) -> bool {
        self.high.get()
    }
}

impl ErrorType for FakeOutput {
    type Error = Infallible;
}

impl OutputPin for FakeOutput {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.high.set(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.high.set(true);
        Ok(())
    }
}

/// PWM channel that records every duty cycle written to it.
#[derive(Clone, Default)]
pub struct FakePwm {
    duties: Rc<RefCell<Vec<u16>>>,
}

impl FakePwm {
    pub const MAX_DUTY: u16 = 1000;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn duties(&self) -> Vec<u16> {
        self.duties.borrow().clone()
    }
}

impl pwm::ErrorType for FakePwm {
    type Error = Infallible;
}

impl SetDutyCycle for FakePwm {
    fn max_duty_cycle(&self) -> u16 {
        Self::MAX_DUTY
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        self.duties.borrow_mut().push(duty);
        Ok(())
    }
}

/// Delay that returns immediately and logs the requested durations in ms.
#[derive(Clone, Default)]
pub struct FakeDelay {
    waits_ms: Rc<RefCell<Vec<u32>>>,
}

impl FakeDelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn waits_ms(&self) -> Vec<u32> {
        self.waits_ms.borrow().clone()
    }
}

impl DelayNs for FakeDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.waits_ms.borrow_mut().push(ns / 1_000_000);
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.waits_ms.borrow_mut().push(ms);
    }
}

/// 128x64 monochrome frame buffer. Clones share the same pixels.
#[derive(Clone)]
pub struct FakePanel {
    pixels: Rc<RefCell<Vec<bool>>>,
    flushes: Rc<Cell<usize>>,
}

impl FakePanel {
    pub fn new() -> Self {
        Self {
            pixels: Rc::new(RefCell::new(std::vec![
                false;
                (DISPLAY_WIDTH * DISPLAY_HEIGHT) as usize
            ])),
            flushes: Rc::new(Cell::new(0)),
        }
    }

    pub fn is_lit(&self, x: u32, y: u32) -> bool {
        self.pixels.borrow()[(y * DISPLAY_WIDTH + x) as usize]
    }

    pub fn frame(&self) -> Vec<bool> {
        self.pixels.borrow().clone()
    }

    pub fn lit_count(&self) -> usize {
        self.pixels.borrow().iter().filter(|lit| **lit).count()
    }

    pub fn flushes(&self) -> usize {
        self.flushes.get()
    }
}

impl OriginDimensions for FakePanel {
    fn size(&self) -> Size {
        Size::new(DISPLAY_WIDTH, DISPLAY_HEIGHT)
    }
}

impl DrawTarget for FakePanel {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let mut buffer = self.pixels.borrow_mut();
        for Pixel(point, color) in pixels {
            if point.x < 0 || point.y < 0 {
                continue;
            }
            let (x, y) = (point.x as u32, point.y as u32);
            if x < DISPLAY_WIDTH && y < DISPLAY_HEIGHT {
                buffer[(y * DISPLAY_WIDTH + x) as usize] = color.is_on();
            }
        }
        Ok(())
    }
}

impl Panel for FakePanel {
    fn flush(&mut self) -> Result<(), Self::Error> {
        self.flushes.set(self.flushes.get() + 1);
        Ok(())
    }
}
