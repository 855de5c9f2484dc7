//! Desktop stand-in for the board: a timer thread plays the TIM2 interrupt,
//! a stdin thread plays the USART2 interrupt and the terminal is the LCD.
use std::{
    fmt,
    io::{self, Read, Stdout, Write},
    sync::{Mutex, MutexGuard},
    thread,
    time::{Duration, Instant},
};

use embedded_hal::digital::PinState;
use lcd_stopwatch::{
    CharDisplay, CommandTask, DisplayTask, Indicator, RolloverTask, Supervisor, TickSource, Unit,
    config::TICK_PERIOD,
    executor,
    future::OurFuture,
};

use crate::{COMMANDS, STOPWATCH};

/// Held by the timer thread for the whole of each tick, so `stop` returning
/// means no tick is in flight, and a state change made under it can't race a
/// tick.
static TICKING: Mutex<bool> = Mutex::new(false);

const INDICATOR_ROW: u8 = 1;

struct ThreadTicker;

impl ThreadTicker {
    fn spawn() -> Self {
        let period = Duration::from_millis(TICK_PERIOD.to_millis().into());

        thread::spawn(move || {
            let mut next = Instant::now();
            loop {
                next += period;
                if let Some(wait) = next.checked_duration_since(Instant::now()) {
                    thread::sleep(wait);
                }

                let ticking = lock_ticking();
                if *ticking {
                    STOPWATCH.on_tick();
                }
            }
        });

        Self
    }

    fn set(&self, ticking: bool) {
        *lock_ticking() = ticking;
    }
}

fn lock_ticking() -> MutexGuard<'static, bool> {
    TICKING.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl TickSource for ThreadTicker {
    fn start(&mut self) {
        self.set(true);
    }

    fn stop(&mut self) {
        self.set(false);
    }

    fn hold<R>(&mut self, f: impl FnOnce() -> R) -> R {
        let _ticking = lock_ticking();
        f()
    }
}

fn spawn_keyboard() {
    thread::spawn(|| {
        for byte in io::stdin().lock().bytes() {
            match byte {
                Ok(byte) => {
                    let _ = COMMANDS.get_sender().send(byte);
                }
                Err(_) => break,
            }
        }

        // Input closed: nothing can ever change state again.
        std::process::exit(0);
    });
}

/// ANSI terminal with 1-based cursor addressing.
struct Terminal {
    out: Stdout,
}

impl Terminal {
    fn new() -> Self {
        let mut out = io::stdout();
        let _ = write!(out, "\x1b[2J");
        let _ = out.flush();
        Self { out }
    }

    fn goto(&mut self, column: u8, row: u8) {
        let _ = write!(self.out, "\x1b[{};{}H", row + 1, column + 1);
    }
}

impl fmt::Write for Terminal {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.out.write_all(s.as_bytes()).map_err(|_| fmt::Error)?;
        self.out.flush().map_err(|_| fmt::Error)
    }
}

impl CharDisplay for Terminal {
    fn locate(&mut self, column: u8, row: u8) {
        self.goto(column, row);
    }
}

/// Shows `PAUSED` on the row under the time.
struct PausedMarker {
    terminal: Terminal,
}

impl Indicator for PausedMarker {
    fn set_state(&mut self, state: PinState) {
        self.terminal.goto(0, INDICATOR_ROW);
        let text = match state {
            PinState::High => "PAUSED\x1b[K",
            PinState::Low => "\x1b[K",
        };
        let _ = fmt::Write::write_str(&mut self.terminal, text);
    }
}

pub fn run() -> ! {
    let ticker = ThreadTicker::spawn();
    spawn_keyboard();

    let marker = PausedMarker {
        terminal: Terminal::new(),
    };
    let mut supervisor = Supervisor::new(&STOPWATCH, ticker, marker);
    supervisor.init();

    let mut seconds_task = RolloverTask::new(Unit::Seconds, &STOPWATCH);
    let mut minutes_task = RolloverTask::new(Unit::Minutes, &STOPWATCH);
    let mut display_task = DisplayTask::new(Terminal { out: io::stdout() }, &STOPWATCH);
    let mut command_task = CommandTask::new(COMMANDS.get_receiver(), supervisor);

    let mut tasks: [&mut dyn OurFuture<Output = ()>; 4] = [
        &mut seconds_task,
        &mut minutes_task,
        &mut display_task,
        &mut command_task,
    ];

    executor::run_tasks(&mut tasks, || {
        if !executor::has_pending_wake() {
            thread::sleep(Duration::from_micros(200));
        }
    });
}
