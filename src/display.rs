//! Status screen for the 128x64 OLED
//!
//! The display task redraws the whole frame on every accepted update: a
//! border, two divider lines, the title, the banner and the free/occupied
//! counts. Updates produced before or after a reset that no longer matches
//! the current program mode are dropped.
//!
//! The count shown is the one carried by the update. Producers post while
//! holding the counter lock, so the display must never wait for that lock.

use core::fmt::Write;

use embedded_graphics::mono_font::ascii::FONT_6X9;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};
use heapless::String;

use crate::config::*;
use crate::types::DisplayUpdate;
use crate::Kiosk;

// ===================================================================
// Panel Abstraction
// ===================================================================

/// A buffered monochrome display: draw into it, then push the frame.
pub trait Panel: DrawTarget<Color = BinaryColor> {
    fn flush(&mut self) -> Result<(), Self::Error>;
}

// ===================================================================
// Screen Content
// ===================================================================

/// Message shown between the two divider lines
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Banner {
    Prompt,
    AllOccupied,
}

impl Banner {
    pub fn text(self) -> &'static str {
        match self {
            Banner::Prompt => BANNER_PROMPT_TEXT,
            Banner::AllOccupied => BANNER_FULL_TEXT,
        }
    }
}

/// Everything the status screen shows
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusScreen {
    pub occupied: u8,
    pub free: u8,
    pub banner: Banner,
}

impl StatusScreen {
    pub fn new(occupied: u8, capacity: u8, overflow: bool) -> Self {
        Self {
            occupied,
            free: capacity.saturating_sub(occupied),
            banner: if overflow {
                Banner::AllOccupied
            } else {
                Banner::Prompt
            },
        }
    }

    pub fn free_line(&self) -> String<SCREEN_LINE_LEN> {
        let mut line = String::new();
        let _ = write!(line, "{}: {}", FREE_LABEL, self.free);
        line
    }

    pub fn occupied_line(&self) -> String<SCREEN_LINE_LEN> {
        let mut line = String::new();
        let _ = write!(line, "{}: {}", OCCUPIED_LABEL, self.occupied);
        line
    }

    /// Draw the full frame onto `target`, replacing whatever was there.
    pub fn draw<T>(&self, target: &mut T) -> Result<(), T::Error>
    where
        T: DrawTarget<Color = BinaryColor>,
    {
        target.clear(BinaryColor::Off)?;

        let stroke = PrimitiveStyle::with_stroke(BinaryColor::On, 1);
        Rectangle::new(
            Point::new(FRAME_ORIGIN.0, FRAME_ORIGIN.1),
            Size::new(FRAME_SIZE.0, FRAME_SIZE.1),
        )
        .into_styled(stroke)
        .draw(target)?;

        for y in DIVIDER_ROWS {
            Line::new(Point::new(DIVIDER_SPAN.0, y), Point::new(DIVIDER_SPAN.1, y))
                .into_styled(stroke)
                .draw(target)?;
        }

        let text_style = MonoTextStyle::new(&FONT_6X9, BinaryColor::On);
        let free = self.free_line();
        let occupied = self.occupied_line();
        let lines = [
            (TITLE_TEXT, TITLE_POS),
            (self.banner.text(), BANNER_POS),
            (free.as_str(), FREE_POS),
            (occupied.as_str(), OCCUPIED_POS),
        ];
        for (text, (x, y)) in lines {
            Text::with_baseline(text, Point::new(x, y), text_style, Baseline::Top).draw(target)?;
        }

        Ok(())
    }
}

// ===================================================================
// Display Task Implementation
// ===================================================================

pub struct DisplayTask<'a, P> {
    kiosk: &'a Kiosk,
    panel: P,
}

impl<'a, P: Panel> DisplayTask<'a, P> {
    pub fn new(kiosk: &'a Kiosk, panel: P) -> Self {
        Self { kiosk, panel }
    }

    fn screen_for(&self, update: &DisplayUpdate) -> StatusScreen {
        StatusScreen::new(update.occupancy, self.kiosk.counter.capacity(), update.overflow)
    }

    fn render(&mut self, screen: &StatusScreen) {
        if screen.draw(&mut self.panel).is_err() {
            error!("Failed to draw status screen");
            return;
        }
        if self.panel.flush().is_err() {
            error!("Failed to flush status screen");
        }
    }

    /// Draw the screen shown before any button has been pressed.
    pub fn show_boot_screen(&mut self) -> StatusScreen {
        let screen = StatusScreen::new(0, self.kiosk.counter.capacity(), false);
        self.render(&screen);
        screen
    }

    /// Apply one update. Returns the drawn screen, or `None` when the update
    /// was stale for the current program mode.
    pub fn handle(&mut self, update: DisplayUpdate) -> Option<StatusScreen> {
        let resetting = self.kiosk.mode.is_resetting();
        if update.reset_origin != resetting {
            debug!("Discarding stale display update {}", update);
            return None;
        }

        let screen = self.screen_for(&update);
        self.render(&screen);

        if resetting && self.kiosk.mode.finish_reset() {
            info!("Reset sequence complete");
        }
        Some(screen)
    }

    pub async fn run(mut self) -> ! {
        info!("Display task started");
        self.show_boot_screen();

        loop {
            let update = self.kiosk.display.receive().await;
            self.handle(update);
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::buttons::{register_entry, register_exit};
    use crate::buzzer::{Buzzer, BuzzerTask};
    use crate::reset::ResetTask;
    use crate::testing::{FakeDelay, FakePanel, FakePwm};
    use core::pin::pin;
    use core::task::Poll;
    use embassy_futures::join::join;
    use embassy_futures::select::select3;
    use embassy_futures::{block_on, poll_once, yield_now};

    #[test]
    fn screen_lines_show_free_and_occupied() {
        let screen = StatusScreen::new(3, 10, false);
        assert_eq!(screen.free_line().as_str(), "Livres: 7");
        assert_eq!(screen.occupied_line().as_str(), "Ocupados: 3");
        assert_eq!(screen.banner.text(), "Verifique!");

        let full = StatusScreen::new(10, 10, true);
        assert_eq!(full.free_line().as_str(), "Livres: 0");
        assert_eq!(full.occupied_line().as_str(), "Ocupados: 10");
        assert_eq!(full.banner.text(), "Todos ocupados!");
    }

    #[test]
    fn frame_has_border_and_dividers() {
        let mut panel = FakePanel::new();
        StatusScreen::new(0, 10, false).draw(&mut panel).unwrap();

        // Border corners
        assert!(panel.is_lit(3, 3));
        assert!(panel.is_lit(124, 3));
        assert!(panel.is_lit(3, 62));
        assert!(panel.is_lit(124, 62));
        // Dividers
        assert!(panel.is_lit(60, 25));
        assert!(panel.is_lit(60, 37));
        // Outside the border
        assert!(!panel.is_lit(0, 0));
        assert!(!panel.is_lit(127, 63));
    }

    #[test]
    fn banner_changes_the_frame() {
        let prompt = FakePanel::new();
        StatusScreen::new(10, 10, false).draw(&mut prompt.clone()).unwrap();
        let full = FakePanel::new();
        StatusScreen::new(10, 10, true).draw(&mut full.clone()).unwrap();

        assert_ne!(prompt.lit_count(), full.lit_count());
    }

    #[test]
    fn boot_screen_is_flushed() {
        let kiosk = Kiosk::new();
        let panel = FakePanel::new();
        let mut task = DisplayTask::new(&kiosk, panel.clone());

        let screen = task.show_boot_screen();
        assert_eq!(screen, StatusScreen::new(0, 10, false));
        assert_eq!(panel.flushes(), 1);
        assert!(panel.lit_count() > 0);
    }

    #[test]
    fn update_renders_the_carried_count() {
        let kiosk = Kiosk::new();
        let panel = FakePanel::new();
        let mut task = DisplayTask::new(&kiosk, panel.clone());

        assert_eq!(block_on(register_entry(&kiosk)), Ok(1));
        let update = kiosk.display.try_receive().unwrap();

        assert_eq!(task.handle(update), Some(StatusScreen::new(1, 10, false)));
        assert_eq!(panel.flushes(), 1);
    }

    #[test]
    fn update_is_drawn_while_the_counter_is_locked() {
        let kiosk = Kiosk::new();
        let mut task = DisplayTask::new(&kiosk, FakePanel::new());

        let guard = block_on(kiosk.counter.lock());
        assert_eq!(
            task.handle(DisplayUpdate::occupancy_changed(4)),
            Some(StatusScreen::new(4, 10, false))
        );
        drop(guard);
    }

    #[test]
    fn display_drains_while_a_producer_holds_the_lock() {
        let kiosk = Kiosk::new();
        let mut task = DisplayTask::new(&kiosk, FakePanel::new());

        // A pending update keeps the slot full.
        block_on(kiosk.display.send(DisplayUpdate::occupancy_changed(0)));

        let mut entry = pin!(register_entry(&kiosk));
        assert!(poll_once(entry.as_mut()).is_pending());
        assert!(kiosk.counter.is_locked());

        let update = kiosk.display.try_receive().unwrap();
        assert_eq!(task.handle(update), Some(StatusScreen::new(0, 10, false)));
        assert_eq!(poll_once(entry.as_mut()), Poll::Ready(Ok(1)));

        // The entry's own update now fills the slot; an exit blocks on it.
        let mut exit = pin!(register_exit(&kiosk));
        assert!(poll_once(exit.as_mut()).is_pending());
        assert!(kiosk.counter.is_locked());

        let update = kiosk.display.try_receive().unwrap();
        assert_eq!(task.handle(update), Some(StatusScreen::new(1, 10, false)));
        assert_eq!(poll_once(exit.as_mut()), Poll::Ready(Ok(0)));
        assert!(!kiosk.counter.is_locked());

        let update = kiosk.display.try_receive().unwrap();
        assert_eq!(task.handle(update), Some(StatusScreen::new(0, 10, false)));
    }

    #[test]
    fn bursts_and_reset_against_running_tasks() {
        let kiosk = Kiosk::new();
        let panel = FakePanel::new();
        let display = DisplayTask::new(&kiosk, panel.clone());
        let pwm = FakePwm::new();
        let buzzer = BuzzerTask::new(&kiosk, Buzzer::new(pwm.clone()), FakeDelay::new());

        let producers = async {
            join(
                async {
                    for _ in 0..12 {
                        let _ = register_entry(&kiosk).await;
                    }
                },
                async {
                    for _ in 0..4 {
                        let _ = register_exit(&kiosk).await;
                    }
                },
            )
            .await;

            kiosk.reset_line().trigger();
            let released = ResetTask::new(&kiosk).perform().await;
            while kiosk.mode.is_resetting() {
                yield_now().await;
            }
            released
        };

        let released = match block_on(select3(display.run(), buzzer.run(), producers)) {
            embassy_futures::select::Either3::Third(released) => released,
            _ => unreachable!(),
        };

        assert!(released <= 10);
        assert_eq!(block_on(kiosk.counter.occupancy()), 0);
        assert!(!kiosk.counter.is_locked());

        let mut expected = FakePanel::new();
        StatusScreen::new(0, 10, false).draw(&mut expected).unwrap();
        assert_eq!(panel.frame(), expected.frame());
    }

    #[test]
    fn normal_update_during_reset_is_discarded() {
        let kiosk = Kiosk::new();
        let panel = FakePanel::new();
        let mut task = DisplayTask::new(&kiosk, panel.clone());

        kiosk.mode.enter_reset();
        assert_eq!(task.handle(DisplayUpdate::occupancy_changed(3)), None);
        assert_eq!(panel.flushes(), 0);
        assert!(kiosk.mode.is_resetting());
    }

    #[test]
    fn reset_update_outside_reset_is_discarded() {
        let kiosk = Kiosk::new();
        let mut task = DisplayTask::new(&kiosk, FakePanel::new());

        assert_eq!(task.handle(DisplayUpdate::after_reset()), None);
    }

    #[test]
    fn reset_update_ends_reset_mode() {
        let kiosk = Kiosk::new();
        let panel = FakePanel::new();
        let mut task = DisplayTask::new(&kiosk, panel.clone());

        block_on(register_entry(&kiosk)).unwrap();
        kiosk.display.clear();

        kiosk.reset_line().trigger();
        block_on(ResetTask::new(&kiosk).perform());

        let update = kiosk.display.try_receive().unwrap();
        assert_eq!(task.handle(update), Some(StatusScreen::new(0, 10, false)));
        assert!(!kiosk.mode.is_resetting());
        assert_eq!(panel.flushes(), 1);
    }
}
