//! Millisecond stopwatch core: elapsed time accounting, run state machine
//! and the cooperative tasks that tie a tick interrupt, a character display
//! and a serial command stream together.
//!
//! Nothing in here touches hardware. The binary supplies a [`TickSource`],
//! an [`Indicator`], a [`CharDisplay`] and a byte stream, then hands the
//! tasks to [`executor::run_tasks`].
#![cfg_attr(not(test), no_std)]

pub mod channel;
pub mod command;
pub mod config;
pub mod display;
pub mod executor;
pub mod future;
pub mod rollover;
pub mod signal;
pub mod stopwatch;
pub mod supervisor;
pub mod time;

pub use command::{Command, CommandTask};
pub use display::{CharDisplay, DisplayTask};
pub use rollover::{RolloverTask, Unit};
pub use stopwatch::{RunState, Stopwatch};
pub use supervisor::{Indicator, Supervisor, TickSource, Transition};
pub use time::ElapsedTime;

/// Byte channel between the serial receive interrupt and the command task.
pub type CommandChannel = channel::Channel<u8, { config::COMMAND_QUEUE_DEPTH }>;
