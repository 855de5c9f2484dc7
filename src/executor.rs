use heapless::mpmc::Q8;
use portable_atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::future::OurFuture;

static TASK_IS_READY: Q8<usize> = Q8::new();
static WOKEN: AtomicBool = AtomicBool::new(false);

const INVALID_TASK_ID: usize = usize::MAX;

pub fn wake_task(task_id: usize) {
    if TASK_IS_READY.enqueue(task_id).is_err() {
        panic!("Task queue full: can't add task {}", task_id);
    }
    WOKEN.store(true, Ordering::Release);
}

/// True if a task was woken since the executor last started draining the
/// ready queue. An idle hook checks this with interrupts masked before
/// sleeping, so a wake that lands just before `wfi` is not slept through.
pub fn has_pending_wake() -> bool {
    WOKEN.load(Ordering::Acquire)
}

/// Polls every task once, then only the ones that have been woken. `idle` runs
/// whenever nothing is ready; on the MCU that is `wfi`.
pub fn run_tasks(tasks: &mut [&mut dyn OurFuture<Output = ()>], idle: impl Fn()) -> ! {
    for task_id in 0..tasks.len() {
        TASK_IS_READY.enqueue(task_id).ok();
    }

    loop {
        WOKEN.store(false, Ordering::Release);

        while let Some(task_id) = TASK_IS_READY.dequeue() {
            if task_id >= tasks.len() {
                continue;
            }

            tasks[task_id].poll(task_id);
        }

        idle();
    }
}

/// The task currently parked on a wake source, if any.
pub struct WakerSlot {
    task_id: AtomicUsize,
}

impl WakerSlot {
    pub const fn new() -> Self {
        Self {
            task_id: AtomicUsize::new(INVALID_TASK_ID),
        }
    }

    pub fn register(&self, task_id: usize) {
        self.task_id.store(task_id, Ordering::Release);
    }

    /// Swap the slot back to empty before waking so a task lands in the ready
    /// queue at most once per registration.
    pub fn wake(&self) {
        let task_id = self.task_id.swap(INVALID_TASK_ID, Ordering::AcqRel);

        if task_id != INVALID_TASK_ID {
            wake_task(task_id);
        }
    }

    pub fn is_registered(&self) -> bool {
        self.task_id.load(Ordering::Acquire) != INVALID_TASK_ID
    }
}

impl Default for WakerSlot {
    fn default() -> Self {
        Self::new()
    }
}
