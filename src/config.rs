//! Compile-time configuration.
use fugit::{HertzU32, MillisDurationU32};

/// Tick source rate. One tick is one counted millisecond.
pub const TICK_RATE: HertzU32 = HertzU32::from_raw(1_000);
pub const TICK_PERIOD: MillisDurationU32 = MillisDurationU32::from_ticks(1);

/// Display cell the time is drawn at, as (column, row).
pub const DISPLAY_ORIGIN: (u8, u8) = (0, 0);
pub const LCD_COLUMNS: u8 = 16;
pub const LCD_ROWS: u8 = 2;

pub const START_KEY: u8 = b's';
pub const PAUSE_KEY: u8 = b'p';
pub const RESET_KEY: u8 = b'r';

/// Bytes buffered between the serial interrupt and the command task. Must be
/// a power of two.
pub const COMMAND_QUEUE_DEPTH: usize = 16;

pub const SERIAL_BAUD: u32 = 115_200;
