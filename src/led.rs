use embedded_hal::digital::PinState;
use lcd_stopwatch::Indicator;
use stm32f0xx_hal::{
    gpio::{Output, Pin, PushPull},
    prelude::*,
};

/// User LED, lit while the stopwatch is paused.
pub struct StatusLed {
    led: Pin<Output<PushPull>>,
}

impl StatusLed {
    pub fn new(led: Pin<Output<PushPull>>) -> Self {
        Self { led }
    }
}

impl Indicator for StatusLed {
    fn set_state(&mut self, state: PinState) {
        let _ = match state {
            PinState::High => self.led.set_high(),
            PinState::Low => self.led.set_low(),
        };
    }
}
