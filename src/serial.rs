use core::cell::RefCell;
use cortex_m::peripheral::NVIC;
use critical_section::Mutex;
use rtt_target::rprintln;
use stm32f0xx_hal::{
    pac::{interrupt, Interrupt, USART2},
    prelude::*,
    serial::Rx,
};

use crate::COMMANDS;

static G_RX: Mutex<RefCell<Option<Rx<USART2>>>> = Mutex::new(RefCell::new(None));

/// Hand the receiver to the USART2 interrupt. RXNE must already be enabled on
/// the port.
pub fn listen(rx: Rx<USART2>) {
    critical_section::with(|cs| {
        G_RX.borrow(cs).replace(Some(rx));
    });

    unsafe {
        NVIC::unmask(Interrupt::USART2);
    }
}

#[interrupt]
fn USART2() {
    let received = critical_section::with(|cs| {
        let mut rx = G_RX.borrow_ref_mut(cs);
        match rx.as_mut()?.read() {
            Ok(byte) => Some(byte),
            Err(nb::Error::WouldBlock) => None,
            Err(nb::Error::Other(error)) => {
                rprintln!("serial: {:?}", error);
                None
            }
        }
    });

    if let Some(byte) = received {
        // Full means the command task is far behind; drop the keystroke
        let _ = COMMANDS.get_sender().send(byte);
    }
}
