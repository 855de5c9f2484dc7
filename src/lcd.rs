//! HD44780 character LCD on a 4-bit parallel bus.
use core::fmt;

use lcd_stopwatch::{
    CharDisplay,
    config::{LCD_COLUMNS, LCD_ROWS},
};
use stm32f0xx_hal::{
    delay::Delay,
    gpio::{Output, Pin, PushPull},
    prelude::*,
};

const CLEAR_DISPLAY: u8 = 0x01;
const ENTRY_MODE_SET: u8 = 0x04;
const ENTRY_INCREMENT: u8 = 0x02;
const DISPLAY_CONTROL: u8 = 0x08;
const DISPLAY_ON: u8 = 0x04;
const FUNCTION_SET: u8 = 0x20;
const TWO_LINES: u8 = 0x08;
const SET_DDRAM_ADDR: u8 = 0x80;

/// DDRAM address of the first cell of each row.
const ROW_OFFSETS: [u8; 2] = [0x00, 0x40];

pub struct Lcd {
    rs: Pin<Output<PushPull>>,
    en: Pin<Output<PushPull>>,
    data: [Pin<Output<PushPull>>; 4],
    delay: Delay,
}

impl Lcd {
    /// `data` is D4..D7. Runs the power-on sequence, so the display is blank
    /// and ready on return.
    pub fn new(
        rs: Pin<Output<PushPull>>,
        en: Pin<Output<PushPull>>,
        data: [Pin<Output<PushPull>>; 4],
        delay: Delay,
    ) -> Self {
        let mut lcd = Self { rs, en, data, delay };
        lcd.init();
        lcd
    }

    fn init(&mut self) {
        let _ = self.rs.set_low();
        let _ = self.en.set_low();
        self.delay.delay_ms(50_u16);

        // Force 8-bit mode three times, whatever state the controller woke up
        // in, then drop to 4-bit.
        for _ in 0..3 {
            self.write_nibble(0x03);
            self.delay.delay_us(4_500_u16);
        }
        self.write_nibble(0x02);
        self.delay.delay_us(150_u16);

        self.command(FUNCTION_SET | TWO_LINES);
        self.command(DISPLAY_CONTROL | DISPLAY_ON);
        self.command(CLEAR_DISPLAY);
        self.delay.delay_ms(2_u16);
        self.command(ENTRY_MODE_SET | ENTRY_INCREMENT);
    }

    fn command(&mut self, command: u8) {
        let _ = self.rs.set_low();
        self.write_byte(command);
    }

    fn data(&mut self, byte: u8) {
        let _ = self.rs.set_high();
        self.write_byte(byte);
    }

    fn write_byte(&mut self, byte: u8) {
        self.write_nibble(byte >> 4);
        self.write_nibble(byte & 0x0f);
    }

    fn write_nibble(&mut self, nibble: u8) {
        for (bit, pin) in self.data.iter_mut().enumerate() {
            let _ = if nibble & (1 << bit) != 0 {
                pin.set_high()
            } else {
                pin.set_low()
            };
        }

        let _ = self.en.set_high();
        self.delay.delay_us(1_u16);
        let _ = self.en.set_low();
        // Most instructions take 37us to execute
        self.delay.delay_us(50_u16);
    }
}

impl fmt::Write for Lcd {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for byte in s.bytes() {
            self.data(byte);
        }
        Ok(())
    }
}

impl CharDisplay for Lcd {
    fn locate(&mut self, column: u8, row: u8) {
        let row = row.min(LCD_ROWS - 1) as usize;
        let column = column.min(LCD_COLUMNS - 1);
        self.command(SET_DDRAM_ADDR | (ROW_OFFSETS[row] + column));
    }
}
