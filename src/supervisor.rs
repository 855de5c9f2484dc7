use embedded_hal::digital::PinState;

use crate::{
    command::Command,
    stopwatch::{RunState, Stopwatch},
    time::ElapsedTime,
};

/// The periodic millisecond interrupt.
pub trait TickSource {
    fn start(&mut self);

    /// On return no further tick may reach `Stopwatch::on_tick`.
    fn stop(&mut self);

    /// Run `f` with no tick in flight, so a tick either lands entirely
    /// before the change `f` makes or entirely after it.
    fn hold<R>(&mut self, f: impl FnOnce() -> R) -> R;
}

/// Paused indicator: `High` while paused, `Low` otherwise.
pub trait Indicator {
    fn set_state(&mut self, state: PinState);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Started,
    Paused,
    Resumed,
    Reset,
}

/// Owns the run state transitions and the hardware they switch.
pub struct Supervisor<'a, T, L> {
    stopwatch: &'a Stopwatch,
    ticks: T,
    indicator: L,
}

impl<'a, T: TickSource, L: Indicator> Supervisor<'a, T, L> {
    pub fn new(stopwatch: &'a Stopwatch, ticks: T, indicator: L) -> Self {
        Self {
            stopwatch,
            ticks,
            indicator,
        }
    }

    /// Zero the time, enter `Reset` and ask for 00:00:000 to be drawn. Runs at
    /// boot and again on every reset.
    pub fn init(&mut self) {
        self.stopwatch.clear();
        self.indicator.set_state(PinState::Low);
        self.stopwatch.refresh().raise();
    }

    pub fn state(&self) -> RunState {
        self.stopwatch.state()
    }

    pub fn elapsed(&self) -> ElapsedTime {
        self.stopwatch.elapsed()
    }

    /// Apply a command. Returns `None` when it doesn't apply in the current
    /// state, in which case nothing changed.
    pub fn handle(&mut self, command: Command) -> Option<Transition> {
        match (command, self.stopwatch.state()) {
            (Command::Start, RunState::Reset) => {
                self.stopwatch.clear();
                self.stopwatch.set_state(RunState::Running);
                self.ticks.start();
                Some(Transition::Started)
            }
            (Command::PauseResume, RunState::Running) => {
                let stopwatch = self.stopwatch;
                self.ticks.hold(|| stopwatch.set_state(RunState::Paused));
                self.indicator.set_state(PinState::High);
                Some(Transition::Paused)
            }
            (Command::PauseResume, RunState::Paused) => {
                let stopwatch = self.stopwatch;
                self.ticks.hold(|| stopwatch.set_state(RunState::Running));
                self.indicator.set_state(PinState::Low);
                self.stopwatch.refresh().raise();
                Some(Transition::Resumed)
            }
            (Command::Reset, RunState::Paused) => {
                // Stop ticking first so no tick lands on the zeroed state.
                self.ticks.stop();
                self.init();
                Some(Transition::Reset)
            }
            _ => None,
        }
    }

    pub fn ticks(&self) -> &T {
        &self.ticks
    }

    pub fn indicator(&self) -> &L {
        &self.indicator
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::stopwatch::tests::run_ticks;

    pub(crate) struct FakeTicks<'a> {
        stopwatch: &'a Stopwatch,
        pub running: bool,
        pub starts: u32,
        pub stops: u32,
        /// What the stopwatch held when `stop` was called.
        pub seen_at_stop: Option<(ElapsedTime, RunState)>,
        /// State changes made inside `hold`, as (before, after).
        pub held: Vec<(RunState, RunState)>,
    }

    impl<'a> FakeTicks<'a> {
        pub(crate) fn new(stopwatch: &'a Stopwatch) -> Self {
            Self {
                stopwatch,
                running: false,
                starts: 0,
                stops: 0,
                seen_at_stop: None,
                held: Vec::new(),
            }
        }
    }

    impl TickSource for FakeTicks<'_> {
        fn start(&mut self) {
            self.running = true;
            self.starts += 1;
        }

        fn stop(&mut self) {
            self.running = false;
            self.stops += 1;
            self.seen_at_stop = Some((self.stopwatch.elapsed(), self.stopwatch.state()));
        }

        fn hold<R>(&mut self, f: impl FnOnce() -> R) -> R {
            let before = self.stopwatch.state();
            let result = f();
            self.held.push((before, self.stopwatch.state()));
            result
        }
    }

    #[derive(Default)]
    pub(crate) struct FakeIndicator {
        pub on: bool,
    }

    impl Indicator for FakeIndicator {
        fn set_state(&mut self, state: PinState) {
            self.on = state == PinState::High;
        }
    }

    /// Ticks only reach the stopwatch while the fake tick source is running.
    fn tick(supervisor: &Supervisor<'_, FakeTicks<'_>, FakeIndicator>, count: u32) {
        if supervisor.ticks().running {
            run_ticks(supervisor.stopwatch, count);
        }
    }

    fn booted(stopwatch: &Stopwatch) -> Supervisor<'_, FakeTicks<'_>, FakeIndicator> {
        let mut supervisor =
            Supervisor::new(stopwatch, FakeTicks::new(stopwatch), FakeIndicator::default());
        supervisor.init();
        supervisor
    }

    #[test]
    fn init_requests_initial_draw() {
        let stopwatch = Stopwatch::new();
        let supervisor = booted(&stopwatch);

        assert_eq!(supervisor.state(), RunState::Reset);
        assert_eq!(stopwatch.elapsed(), ElapsedTime::ZERO);
        assert!(stopwatch.refresh().is_pending());
        assert!(!supervisor.indicator().on);
        assert!(!supervisor.ticks().running);
    }

    #[test]
    fn start_only_from_reset() {
        let stopwatch = Stopwatch::new();
        let mut supervisor = booted(&stopwatch);

        assert_eq!(supervisor.handle(Command::Start), Some(Transition::Started));
        assert_eq!(supervisor.state(), RunState::Running);
        assert!(supervisor.ticks().running);

        tick(&supervisor, 700);
        assert_eq!(supervisor.handle(Command::Start), None);
        assert_eq!(stopwatch.elapsed().millis(), 700);

        supervisor.handle(Command::PauseResume);
        assert_eq!(supervisor.handle(Command::Start), None);
        assert_eq!(supervisor.state(), RunState::Paused);
        assert_eq!(supervisor.ticks().starts, 1);
    }

    #[test]
    fn pause_and_resume_preserve_time() {
        let stopwatch = Stopwatch::new();
        let mut supervisor = booted(&stopwatch);
        supervisor.handle(Command::Start);
        tick(&supervisor, 1234);

        assert_eq!(supervisor.handle(Command::PauseResume), Some(Transition::Paused));
        assert!(supervisor.indicator().on);

        // The tick source keeps firing while paused; none of it may count.
        stopwatch.refresh().clear();
        tick(&supervisor, 3000);
        assert_eq!(stopwatch.elapsed(), ElapsedTime::new(0, 1, 234).unwrap());
        assert!(!stopwatch.refresh().is_pending());

        assert_eq!(supervisor.handle(Command::PauseResume), Some(Transition::Resumed));
        assert!(!supervisor.indicator().on);
        assert!(stopwatch.refresh().take());

        tick(&supervisor, 766);
        assert_eq!(stopwatch.elapsed(), ElapsedTime::new(0, 2, 0).unwrap());
    }

    #[test]
    fn pause_and_resume_switch_state_with_ticks_held() {
        let stopwatch = Stopwatch::new();
        let mut supervisor = booted(&stopwatch);
        supervisor.handle(Command::Start);

        supervisor.handle(Command::PauseResume);
        supervisor.handle(Command::PauseResume);

        assert_eq!(
            supervisor.ticks().held,
            [
                (RunState::Running, RunState::Paused),
                (RunState::Paused, RunState::Running),
            ]
        );
    }

    #[test]
    fn reset_stops_ticks_before_zeroing() {
        let stopwatch = Stopwatch::new();
        let mut supervisor = booted(&stopwatch);
        supervisor.handle(Command::Start);
        tick(&supervisor, 1234);
        supervisor.handle(Command::PauseResume);

        supervisor.handle(Command::Reset);

        assert_eq!(
            supervisor.ticks().seen_at_stop,
            Some((ElapsedTime::new(0, 1, 234).unwrap(), RunState::Paused))
        );
        assert_eq!(stopwatch.elapsed(), ElapsedTime::ZERO);
    }

    #[test]
    fn reset_only_while_paused() {
        let stopwatch = Stopwatch::new();
        let mut supervisor = booted(&stopwatch);

        assert_eq!(supervisor.handle(Command::Reset), None);

        supervisor.handle(Command::Start);
        tick(&supervisor, 42);
        assert_eq!(supervisor.handle(Command::Reset), None);
        assert_eq!(supervisor.state(), RunState::Running);
        assert_eq!(supervisor.ticks().stops, 0);
    }

    #[test]
    fn reset_while_paused_needs_start_again() {
        let stopwatch = Stopwatch::new();
        let mut supervisor = booted(&stopwatch);
        supervisor.handle(Command::Start);
        tick(&supervisor, 61_500);
        supervisor.handle(Command::PauseResume);
        stopwatch.refresh().clear();

        assert_eq!(supervisor.handle(Command::Reset), Some(Transition::Reset));
        assert_eq!(supervisor.state(), RunState::Reset);
        assert_eq!(stopwatch.elapsed(), ElapsedTime::ZERO);
        assert!(!supervisor.ticks().running);
        assert!(!supervisor.indicator().on);
        assert!(stopwatch.refresh().is_pending());

        tick(&supervisor, 500);
        assert_eq!(stopwatch.elapsed(), ElapsedTime::ZERO);

        assert_eq!(supervisor.handle(Command::PauseResume), None);
        supervisor.handle(Command::Start);
        tick(&supervisor, 500);
        assert_eq!(stopwatch.elapsed(), ElapsedTime::new(0, 0, 500).unwrap());
    }

    #[test]
    fn pause_in_reset_changes_nothing() {
        let stopwatch = Stopwatch::new();
        let mut supervisor = booted(&stopwatch);

        for _ in 0..3 {
            assert_eq!(supervisor.handle(Command::PauseResume), None);
        }
        assert_eq!(supervisor.state(), RunState::Reset);
        assert!(!supervisor.indicator().on);
    }
}
