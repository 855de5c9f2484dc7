use rtt_target::rprintln;

use crate::{
    config::{PAUSE_KEY, RESET_KEY, START_KEY},
    future::{OurFuture, Poll},
    supervisor::{Indicator, Supervisor, TickSource, Transition},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    PauseResume,
    Reset,
}

impl Command {
    /// Case sensitive; anything else is not a command.
    pub fn parse(byte: u8) -> Option<Self> {
        match byte {
            START_KEY => Some(Command::Start),
            PAUSE_KEY => Some(Command::PauseResume),
            RESET_KEY => Some(Command::Reset),
            _ => None,
        }
    }
}

/// Reads command bytes and feeds them to the supervisor. Unknown bytes and
/// commands that don't apply in the current state are dropped.
pub struct CommandTask<'a, I, T, L> {
    input: I,
    supervisor: Supervisor<'a, T, L>,
}

impl<'a, I, T, L> CommandTask<'a, I, T, L>
where
    I: OurFuture<Output = u8>,
    T: TickSource,
    L: Indicator,
{
    pub fn new(input: I, supervisor: Supervisor<'a, T, L>) -> Self {
        Self { input, supervisor }
    }

    pub fn supervisor(&self) -> &Supervisor<'a, T, L> {
        &self.supervisor
    }

    fn handle(&mut self, byte: u8) {
        let Some(command) = Command::parse(byte) else {
            return;
        };

        match self.supervisor.handle(command) {
            Some(Transition::Paused) => rprintln!(
                "{:?} -> Paused after {} ms",
                command,
                self.supervisor.elapsed().as_duration().to_millis()
            ),
            Some(transition) => rprintln!("{:?} -> {:?}", command, transition),
            None => rprintln!("{:?} ignored in {:?}", command, self.supervisor.state()),
        }
    }
}

impl<I, T, L> OurFuture for CommandTask<'_, I, T, L>
where
    I: OurFuture<Output = u8>,
    T: TickSource,
    L: Indicator,
{
    type Output = ();

    fn poll(&mut self, task_id: usize) -> Poll<Self::Output> {
        while let Poll::Ready(byte) = self.input.poll(task_id) {
            self.handle(byte);
        }

        Poll::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        channel::Channel,
        stopwatch::{RunState, Stopwatch},
        supervisor::tests::{FakeIndicator, FakeTicks},
        time::ElapsedTime,
    };

    #[test]
    fn parses_only_the_three_keys() {
        assert_eq!(Command::parse(b's'), Some(Command::Start));
        assert_eq!(Command::parse(b'p'), Some(Command::PauseResume));
        assert_eq!(Command::parse(b'r'), Some(Command::Reset));

        for byte in [b'S', b'P', b'R', b'x', b'\n', b'\r', b' ', 0, 0xff] {
            assert_eq!(Command::parse(byte), None);
        }
    }

    #[test]
    fn drains_every_buffered_byte() {
        let stopwatch = Stopwatch::new();
        let channel: Channel<u8, 16> = Channel::new();
        let sender = channel.get_sender();
        let mut supervisor =
            Supervisor::new(&stopwatch, FakeTicks::new(&stopwatch), FakeIndicator::default());
        supervisor.init();

        for byte in *b"xs?p\n" {
            sender.send(byte).unwrap();
        }

        let mut task = CommandTask::new(channel.get_receiver(), supervisor);
        assert!(!task.poll(0).is_ready());

        assert_eq!(stopwatch.state(), RunState::Paused);
        assert_eq!(stopwatch.elapsed(), ElapsedTime::ZERO);
        assert!(task.supervisor().ticks().running);
        assert!(task.supervisor().indicator().on);
    }
}
