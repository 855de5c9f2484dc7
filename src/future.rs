pub enum Poll<T> {
    Ready(T),
    Pending,
}

impl<T> Poll<T> {
    pub fn is_ready(&self) -> bool {
        matches!(self, Poll::Ready(_))
    }
}

/// A task the executor can drive. `task_id` is the slot the task occupies in
/// the executor, and is what a wake source has to hand back to `wake_task`.
pub trait OurFuture {
    type Output;

    fn poll(&mut self, task_id: usize) -> Poll<Self::Output>;
}
