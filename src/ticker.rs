use core::cell::RefCell;
use core::ops::DerefMut;
use cortex_m::interrupt::{free, Mutex};
use cortex_m::peripheral::NVIC;

use lcd_stopwatch::{config::TICK_RATE, TickSource};
use stm32f0xx_hal::{
    pac::{interrupt, Interrupt, TIM2},
    prelude::*,
    rcc::Rcc,
    time::Hertz,
    timers::{Event, Timer},
};

use crate::STOPWATCH;

// Global variable to share the timer with its interrupt
static G_TIM2: Mutex<RefCell<Option<Timer<TIM2>>>> = Mutex::new(RefCell::new(None));

/// TIM2 as the stopwatch's millisecond tick. Configured at boot, but the
/// update interrupt stays off until `start`.
pub struct Ticker {}

impl Ticker {
    pub fn new(tim2: TIM2, rcc: &mut Rcc) -> Self {
        let timer = Timer::tim2(tim2, Hertz(TICK_RATE.raw()), rcc);

        // Move timer into the global mutex
        free(|cs| {
            G_TIM2.borrow(cs).replace(Some(timer));
        });

        // Enable TIM2 interrupt in the NVIC
        unsafe {
            NVIC::unmask(Interrupt::TIM2);
        }

        Self {}
    }
}

impl TickSource for Ticker {
    fn start(&mut self) {
        free(|cs| {
            if let Some(tim2) = G_TIM2.borrow(cs).borrow_mut().deref_mut() {
                // Restart the count so the first tick is a whole period away
                tim2.start(Hertz(TICK_RATE.raw()));
                tim2.listen(Event::TimeOut);
            }
        });
    }

    fn stop(&mut self) {
        free(|cs| {
            if let Some(tim2) = G_TIM2.borrow(cs).borrow_mut().deref_mut() {
                tim2.unlisten(Event::TimeOut);
                let _ = tim2.wait();
            }

            // A tick that fired while we held the lock must not run afterwards
            NVIC::unpend(Interrupt::TIM2);
        });
    }

    fn hold<R>(&mut self, f: impl FnOnce() -> R) -> R {
        free(|_| f())
    }
}

// TIM2 interrupt handler
#[interrupt]
fn TIM2() {
    free(|cs| {
        if let Some(tim2) = G_TIM2.borrow(cs).borrow_mut().deref_mut() {
            // This acknowledges the interrupt
            let _ = tim2.wait();
        }
    });

    STOPWATCH.on_tick();
}
