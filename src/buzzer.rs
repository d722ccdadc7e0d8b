//! Buzzer driver and task
//!
//! Plays N short beeps per request at a fixed tone. Requests that arrive
//! while a sequence is playing wait in the buzzer mailbox.

use embedded_hal::pwm::SetDutyCycle;
use embedded_hal_async::delay::DelayNs;

use crate::config::{BEEP_OFF_MS, BEEP_ON_MS, BUZZER_DUTY_PERCENT};
use crate::types::BeepRequest;
use crate::Kiosk;

pub struct Buzzer<P> {
    pwm: P,
}

impl<P: SetDutyCycle> Buzzer<P> {
    /// Wraps an already configured PWM channel and silences it.
    pub fn new(pwm: P) -> Self {
        let mut buzzer = Self { pwm };
        buzzer.tone(false);
        buzzer
    }

    fn tone(&mut self, on: bool) {
        let result = if on {
            self.pwm.set_duty_cycle_percent(BUZZER_DUTY_PERCENT)
        } else {
            self.pwm.set_duty_cycle_fully_off()
        };
        if result.is_err() {
            error!("Buzzer PWM update failed");
        }
    }

    pub async fn beep<D: DelayNs>(&mut self, count: u8, delay: &mut D) {
        for _ in 0..count {
            self.tone(true);
            delay.delay_ms(BEEP_ON_MS).await;
            self.tone(false);
            delay.delay_ms(BEEP_OFF_MS).await;
        }
    }
}

// ===================================================================
// Buzzer Task Implementation
// ===================================================================

pub struct BuzzerTask<'a, P, D> {
    kiosk: &'a Kiosk,
    buzzer: Buzzer<P>,
    delay: D,
}

impl<'a, P, D> BuzzerTask<'a, P, D>
where
    P: SetDutyCycle,
    D: DelayNs,
{
    pub fn new(kiosk: &'a Kiosk, buzzer: Buzzer<P>, delay: D) -> Self {
        Self {
            kiosk,
            buzzer,
            delay,
        }
    }

    /// Wait for one request and play it to the end.
    pub async fn serve_one(&mut self) -> BeepRequest {
        let request = self.kiosk.buzzer.receive().await;
        debug!("Playing {} beeps", request.count);
        self.buzzer.beep(request.count, &mut self.delay).await;
        request
    }

    pub async fn run(mut self) -> ! {
        info!("Buzzer task started");

        loop {
            self.serve_one().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeDelay, FakePwm};
    use embassy_futures::block_on;

    #[test]
    fn new_buzzer_is_silent() {
        let pwm = FakePwm::new();
        let _buzzer = Buzzer::new(pwm.clone());
        assert_eq!(pwm.duties(), [0]);
    }

    #[test]
    fn beep_alternates_tone_and_silence() {
        let pwm = FakePwm::new();
        let mut delay = FakeDelay::new();
        let mut buzzer = Buzzer::new(pwm.clone());

        block_on(buzzer.beep(2, &mut delay));

        let half = FakePwm::MAX_DUTY / 2;
        assert_eq!(pwm.duties(), [0, half, 0, half, 0]);
        assert_eq!(delay.waits_ms(), [100, 100, 100, 100]);
    }

    #[test]
    fn task_plays_the_requested_count() {
        let kiosk = Kiosk::new();
        let pwm = FakePwm::new();
        let delay = FakeDelay::new();
        let mut task = BuzzerTask::new(&kiosk, Buzzer::new(pwm.clone()), delay.clone());

        block_on(kiosk.buzzer.send(BeepRequest::new(1)));
        assert_eq!(block_on(task.serve_one()), BeepRequest::new(1));
        assert_eq!(delay.waits_ms().len(), 2);

        block_on(kiosk.buzzer.send(BeepRequest::new(2)));
        block_on(task.serve_one());
        assert_eq!(delay.waits_ms().len(), 6);
        assert_eq!(pwm.duties().iter().filter(|d| **d > 0).count(), 3);
    }
}
