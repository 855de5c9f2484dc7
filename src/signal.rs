use portable_atomic::{AtomicBool, Ordering};

use crate::{
    executor::WakerSlot,
    future::{OurFuture, Poll},
};

/// One-bit event flag. Raising an already raised signal is a no-op, and a
/// signal raised before anyone waits stays pending until it is consumed.
pub struct Signal {
    pending: AtomicBool,
    waiter: WakerSlot,
}

impl Signal {
    pub const fn new() -> Self {
        Self {
            pending: AtomicBool::new(false),
            waiter: WakerSlot::new(),
        }
    }

    /// Safe to call from interrupt context.
    pub fn raise(&self) {
        self.pending.store(true, Ordering::Release);
        self.waiter.wake();
    }

    /// Consume a pending signal without registering as a waiter.
    pub fn take(&self) -> bool {
        self.pending.swap(false, Ordering::AcqRel)
    }

    pub fn clear(&self) {
        self.pending.store(false, Ordering::Release);
    }

    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    /// Wake `task_id` the next time the signal is raised, or straight away if
    /// it already is. Leaves the pending bit alone.
    pub fn subscribe(&self, task_id: usize) {
        self.waiter.register(task_id);

        if self.is_pending() {
            self.waiter.wake();
        }
    }

    pub fn wait(&self) -> Wait<'_> {
        Wait { signal: self }
    }

    fn poll(&self, task_id: usize) -> Poll<()> {
        if self.take() {
            return Poll::Ready(());
        }

        self.waiter.register(task_id);

        // The signal may have been raised between the first check and the
        // registration, in which case nobody woke us.
        if self.take() {
            Poll::Ready(())
        } else {
            Poll::Pending
        }
    }
}

impl Default for Signal {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Wait<'a> {
    signal: &'a Signal,
}

impl OurFuture for Wait<'_> {
    type Output = ();

    fn poll(&mut self, task_id: usize) -> Poll<Self::Output> {
        self.signal.poll(task_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raised_before_wait_is_not_lost() {
        let signal = Signal::new();
        signal.raise();

        assert!(signal.wait().poll(0).is_ready());
        assert!(!signal.is_pending());
    }

    #[test]
    fn repeated_raises_coalesce() {
        let signal = Signal::new();
        signal.raise();
        signal.raise();
        signal.raise();

        assert!(signal.take());
        assert!(!signal.take());
    }

    #[test]
    fn clear_drops_pending() {
        let signal = Signal::new();
        signal.raise();
        signal.clear();

        assert!(!signal.is_pending());
        assert!(!signal.take());
    }

    #[test]
    fn pending_wait_registers_and_raise_wakes() {
        let signal = Signal::new();
        let mut wait = signal.wait();

        assert!(!wait.poll(5).is_ready());
        assert!(signal.waiter.is_registered());

        signal.raise();
        assert!(!signal.waiter.is_registered());
        assert!(wait.poll(5).is_ready());
    }
}
