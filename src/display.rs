use core::fmt::Write;

use crate::{
    config::DISPLAY_ORIGIN,
    future::{OurFuture, Poll},
    stopwatch::Stopwatch,
};

/// A character display with a movable cursor.
pub trait CharDisplay: Write {
    fn locate(&mut self, column: u8, row: u8);
}

/// Redraws the elapsed time whenever a refresh is requested. Requests that
/// pile up between two polls collapse into one draw of the latest value.
///
/// A draw on the LCD takes about as long as a tick, so the task draws at most
/// once per poll and goes to the back of the ready queue for the next one.
pub struct DisplayTask<'a, D> {
    display: D,
    stopwatch: &'a Stopwatch,
}

impl<'a, D: CharDisplay> DisplayTask<'a, D> {
    pub fn new(display: D, stopwatch: &'a Stopwatch) -> Self {
        Self { display, stopwatch }
    }

    fn draw(&mut self) {
        let (column, row) = DISPLAY_ORIGIN;
        self.display.locate(column, row);

        // A failed write is repaired by the next refresh.
        let _ = write!(self.display, "{}", self.stopwatch.elapsed());
    }

    pub fn display(&self) -> &D {
        &self.display
    }
}

impl<D: CharDisplay> OurFuture for DisplayTask<'_, D> {
    type Output = ();

    fn poll(&mut self, task_id: usize) -> Poll<Self::Output> {
        if self.stopwatch.refresh().take() {
            self.draw();
        }

        self.stopwatch.refresh().subscribe(task_id);
        Poll::Pending
    }
}
