use core::fmt;

use fugit::MillisDurationU32;

pub const MILLIS_PER_SECOND: u16 = 1000;
pub const SECONDS_PER_MINUTE: u8 = 60;
/// The display only has two minute digits.
pub const MINUTES_WRAP: u8 = 100;

const MILLIS_BITS: u32 = 10;
const SECONDS_BITS: u32 = 6;
const MILLIS_MASK: u32 = (1 << MILLIS_BITS) - 1;
const SECONDS_MASK: u32 = (1 << SECONDS_BITS) - 1;
const SECONDS_SHIFT: u32 = MILLIS_BITS;
const MINUTES_SHIFT: u32 = MILLIS_BITS + SECONDS_BITS;

/// Which units a tick carried into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Carry {
    None,
    Second,
    /// A second carried into the minutes, which may have wrapped.
    Minute,
}

/// Elapsed stopwatch time, always normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ElapsedTime {
    minutes: u8,
    seconds: u8,
    millis: u16,
}

impl ElapsedTime {
    pub const ZERO: Self = Self {
        minutes: 0,
        seconds: 0,
        millis: 0,
    };

    pub const fn new(minutes: u8, seconds: u8, millis: u16) -> Option<Self> {
        let time = Self {
            minutes,
            seconds,
            millis,
        };

        if time.is_normalized() { Some(time) } else { None }
    }

    pub const fn minutes(&self) -> u8 {
        self.minutes
    }

    pub const fn seconds(&self) -> u8 {
        self.seconds
    }

    pub const fn millis(&self) -> u16 {
        self.millis
    }

    pub const fn is_normalized(&self) -> bool {
        self.minutes < MINUTES_WRAP
            && self.seconds < SECONDS_PER_MINUTE
            && self.millis < MILLIS_PER_SECOND
    }

    /// Returns true when the milliseconds wrapped and a second is owed.
    pub fn advance_millis(&mut self) -> bool {
        self.millis += 1;
        if self.millis == MILLIS_PER_SECOND {
            self.millis = 0;
            true
        } else {
            false
        }
    }

    /// Returns true when the seconds wrapped and a minute is owed.
    pub fn advance_seconds(&mut self) -> bool {
        self.seconds += 1;
        if self.seconds == SECONDS_PER_MINUTE {
            self.seconds = 0;
            true
        } else {
            false
        }
    }

    /// Wraps at 100 with nothing further to carry into.
    pub fn advance_minutes(&mut self) {
        self.minutes += 1;
        if self.minutes == MINUTES_WRAP {
            self.minutes = 0;
        }
    }

    /// One millisecond, carried all the way up.
    pub fn tick(&mut self) -> Carry {
        if !self.advance_millis() {
            return Carry::None;
        }
        if !self.advance_seconds() {
            return Carry::Second;
        }
        self.advance_minutes();
        Carry::Minute
    }

    pub fn as_duration(&self) -> MillisDurationU32 {
        let seconds = self.minutes as u32 * SECONDS_PER_MINUTE as u32 + self.seconds as u32;
        MillisDurationU32::from_ticks(seconds * MILLIS_PER_SECOND as u32 + self.millis as u32)
    }

    /// Packs the tuple into one word so it can be shared through a single
    /// atomic.
    pub const fn pack(self) -> u32 {
        (self.minutes as u32) << MINUTES_SHIFT
            | (self.seconds as u32) << SECONDS_SHIFT
            | self.millis as u32
    }

    pub fn unpack(word: u32) -> Self {
        let time = Self {
            minutes: (word >> MINUTES_SHIFT) as u8,
            seconds: ((word >> SECONDS_SHIFT) & SECONDS_MASK) as u8,
            millis: (word & MILLIS_MASK) as u16,
        };
        debug_assert!(time.is_normalized(), "corrupt elapsed time {:#x}", word);
        time
    }
}

/// `MM:SS:mmm`, zero padded.
impl fmt::Display for ElapsedTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:03}", self.minutes, self.seconds, self.millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_rolls_on_the_thousandth_tick() {
        let mut time = ElapsedTime::ZERO;

        for _ in 0..999 {
            assert!(!time.advance_millis());
        }
        assert_eq!(time.millis(), 999);

        assert!(time.advance_millis());
        assert_eq!(time.millis(), 0);
    }

    #[test]
    fn sixty_seconds_owe_one_minute() {
        let mut time = ElapsedTime::ZERO;
        let carries = (0..60).filter(|_| time.advance_seconds()).count();

        assert_eq!(carries, 1);
        assert_eq!(time.seconds(), 0);
    }

    #[test]
    fn minutes_wrap_at_one_hundred() {
        let mut time = ElapsedTime::ZERO;
        for _ in 0..99 {
            time.advance_minutes();
        }
        assert_eq!(time.minutes(), 99);

        time.advance_minutes();
        assert_eq!(time, ElapsedTime::ZERO);
    }

    #[test]
    fn tick_carries_in_one_step() {
        let mut time = ElapsedTime::new(0, 59, 998).unwrap();
        assert_eq!(time.tick(), Carry::None);
        assert_eq!(time.tick(), Carry::Minute);
        assert_eq!(time, ElapsedTime::new(1, 0, 0).unwrap());

        let mut time = ElapsedTime::new(3, 7, 999).unwrap();
        assert_eq!(time.tick(), Carry::Second);
        assert_eq!(time, ElapsedTime::new(3, 8, 0).unwrap());

        let mut time = ElapsedTime::new(99, 59, 999).unwrap();
        assert_eq!(time.tick(), Carry::Minute);
        assert_eq!(time, ElapsedTime::ZERO);
    }

    #[test]
    fn rejects_out_of_range_fields() {
        assert!(ElapsedTime::new(99, 59, 999).is_some());
        assert!(ElapsedTime::new(100, 0, 0).is_none());
        assert!(ElapsedTime::new(0, 60, 0).is_none());
        assert!(ElapsedTime::new(0, 0, 1000).is_none());
    }

    #[test]
    fn packing_keeps_every_field() {
        let time = ElapsedTime::new(99, 59, 999).unwrap();
        assert_eq!(ElapsedTime::unpack(time.pack()), time);
        assert_eq!(ElapsedTime::ZERO.pack(), 0);
    }

    #[test]
    fn renders_zero_padded() {
        let time = ElapsedTime::new(5, 23, 7).unwrap();
        assert_eq!(time.to_string(), "05:23:007");
        assert_eq!(ElapsedTime::ZERO.to_string(), "00:00:000");
    }

    #[test]
    fn converts_to_millis() {
        let time = ElapsedTime::new(1, 1, 500).unwrap();
        assert_eq!(time.as_duration().to_millis(), 61_500);
    }
}
