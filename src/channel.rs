use heapless::mpmc::MpMcQueue;

use crate::{
    executor::WakerSlot,
    future::{OurFuture, Poll},
};

/// Bounded queue that an interrupt handler can push into and a task can wait
/// on. `N` must be a power of two.
pub struct Channel<T, const N: usize> {
    queue: MpMcQueue<T, N>,
    receiver_task: WakerSlot,
}

impl<T, const N: usize> Channel<T, N> {
    pub const fn new() -> Self {
        Self {
            queue: MpMcQueue::new(),
            receiver_task: WakerSlot::new(),
        }
    }

    pub fn get_sender(&self) -> Sender<'_, T, N> {
        Sender { channel: self }
    }

    pub fn get_receiver(&self) -> Receiver<'_, T, N> {
        Receiver { channel: self }
    }
}

impl<T, const N: usize> Default for Channel<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy)]
pub struct Sender<'a, T, const N: usize> {
    channel: &'a Channel<T, N>,
}

impl<T, const N: usize> Sender<'_, T, N> {
    /// Hands the item back when the channel is full.
    pub fn send(&self, item: T) -> Result<(), T> {
        self.channel.queue.enqueue(item)?;
        self.channel.receiver_task.wake();
        Ok(())
    }
}

pub struct Receiver<'a, T, const N: usize> {
    channel: &'a Channel<T, N>,
}

impl<T, const N: usize> Receiver<'_, T, N> {
    pub fn try_receive(&mut self) -> Option<T> {
        self.channel.queue.dequeue()
    }
}

impl<T, const N: usize> OurFuture for Receiver<'_, T, N> {
    type Output = T;

    fn poll(&mut self, task_id: usize) -> Poll<Self::Output> {
        if let Some(item) = self.channel.queue.dequeue() {
            return Poll::Ready(item);
        }

        self.channel.receiver_task.register(task_id);

        match self.channel.queue.dequeue() {
            Some(item) => Poll::Ready(item),
            None => Poll::Pending,
        }
    }
}
