use rtt_target::rprintln;

use crate::{
    future::{OurFuture, Poll},
    stopwatch::Stopwatch,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Seconds,
    Minutes,
}

/// Handles a unit rolling over. The carry itself is already in the stopwatch
/// by the time the task runs; the task only counts and reports it.
pub struct RolloverTask<'a> {
    unit: Unit,
    stopwatch: &'a Stopwatch,
    count: u32,
}

impl<'a> RolloverTask<'a> {
    pub fn new(unit: Unit, stopwatch: &'a Stopwatch) -> Self {
        Self {
            unit,
            stopwatch,
            count: 0,
        }
    }

    /// Rollovers seen since boot. Coalesced notifications count once.
    pub fn count(&self) -> u32 {
        self.count
    }
}

impl OurFuture for RolloverTask<'_> {
    type Output = ();

    fn poll(&mut self, task_id: usize) -> Poll<Self::Output> {
        let signal = match self.unit {
            Unit::Seconds => self.stopwatch.second_rollover(),
            Unit::Minutes => self.stopwatch.minute_rollover(),
        };

        while let Poll::Ready(()) = signal.wait().poll(task_id) {
            self.count = self.count.wrapping_add(1);

            if self.unit == Unit::Minutes {
                rprintln!("{} elapsed", self.stopwatch.elapsed());
            }
        }

        Poll::Pending
    }
}
