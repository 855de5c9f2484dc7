use portable_atomic::{AtomicU8, AtomicU32, Ordering};

use crate::{
    signal::Signal,
    time::{Carry, ElapsedTime},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RunState {
    Reset = 0,
    Running = 1,
    Paused = 2,
}

impl RunState {
    fn from_raw(raw: u8) -> Self {
        match raw {
            1 => RunState::Running,
            2 => RunState::Paused,
            _ => RunState::Reset,
        }
    }
}

/// Shared stopwatch state. Lives in a `static` so the tick interrupt and the
/// tasks can both reach it; every field is an atomic.
///
/// The tick interrupt advances the packed time and carries it in a single
/// read-modify-write, so a reader always gets a fully carried tuple. `second`
/// and `minute` only tell the rollover tasks that a carry happened.
pub struct Stopwatch {
    elapsed: AtomicU32,
    state: AtomicU8,
    second: Signal,
    minute: Signal,
    refresh: Signal,
}

impl Stopwatch {
    pub const fn new() -> Self {
        Self {
            elapsed: AtomicU32::new(ElapsedTime::ZERO.pack()),
            state: AtomicU8::new(RunState::Reset as u8),
            second: Signal::new(),
            minute: Signal::new(),
            refresh: Signal::new(),
        }
    }

    pub fn elapsed(&self) -> ElapsedTime {
        ElapsedTime::unpack(self.elapsed.load(Ordering::Acquire))
    }

    pub fn state(&self) -> RunState {
        RunState::from_raw(self.state.load(Ordering::Acquire))
    }

    pub(crate) fn set_state(&self, state: RunState) {
        self.state.store(state as u8, Ordering::Release);
    }

    pub fn second_rollover(&self) -> &Signal {
        &self.second
    }

    pub fn minute_rollover(&self) -> &Signal {
        &self.minute
    }

    pub fn refresh(&self) -> &Signal {
        &self.refresh
    }

    /// Called once per millisecond from the tick interrupt. Ticks arriving
    /// outside `Running` are dropped, so nothing is counted while paused.
    pub fn on_tick(&self) {
        if self.state() != RunState::Running {
            return;
        }

        let mut carry = Carry::None;
        self.elapsed
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |word| {
                let mut time = ElapsedTime::unpack(word);
                carry = time.tick();
                Some(time.pack())
            })
            .ok();

        match carry {
            Carry::None => {}
            Carry::Second => self.second.raise(),
            Carry::Minute => {
                self.second.raise();
                self.minute.raise();
            }
        }

        self.refresh.raise();
    }

    /// Zero the time and go back to `Reset`. The tick source must already be
    /// stopped; rollover notifications from before the reset are discarded.
    pub(crate) fn clear(&self) {
        self.set_state(RunState::Reset);
        self.second.clear();
        self.minute.clear();
        self.elapsed.store(ElapsedTime::ZERO.pack(), Ordering::Release);
    }
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}
