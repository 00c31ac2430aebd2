//! Deferred Task Queue
//!
//! Signal notification does not run inside `set`; it is deferred onto
//! this queue and delivered when the embedder pumps it. That gives a
//! synchronous turn the chance to issue several `set` calls and have
//! subscribers observe only the settled result.
//!
//! # How Flushing Works
//!
//! [`flush`] drains the queue in FIFO order until it is empty — tasks
//! enqueued *during* a flush run within the same flush, like a
//! microtask checkpoint. A reentrant `flush` call from inside a task
//! is a no-op; the outer drain loop picks the new work up.
//!
//! The queue is thread-local: each thread pumps its own tasks, and
//! nothing here is shared across threads.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

type Task = Box<dyn FnOnce()>;

thread_local! {
    static QUEUE: RefCell<VecDeque<Task>> = RefCell::new(VecDeque::new());
    static FLUSHING: Cell<bool> = Cell::new(false);
}

/// Push a task onto this thread's queue.
pub(crate) fn enqueue<F>(task: F)
where
    F: FnOnce() + 'static,
{
    QUEUE.with(|queue| queue.borrow_mut().push_back(Box::new(task)));
}

/// Number of tasks currently waiting.
pub fn pending() -> usize {
    QUEUE.with(|queue| queue.borrow().len())
}

/// Drain this thread's queue until it is empty.
///
/// Call this after each synchronous turn; it is the boundary deferred
/// signal notifications run on.
pub fn flush() {
    // Reentrant flush from inside a task: the outer loop is already
    // draining, so there is nothing to do.
    if FLUSHING.with(|flag| flag.replace(true)) {
        return;
    }
    let _reset = FlushReset;

    loop {
        let task = QUEUE.with(|queue| queue.borrow_mut().pop_front());
        match task {
            Some(task) => task(),
            None => break,
        }
    }
}

/// Clears the flushing flag even if a task panics mid-flush.
struct FlushReset;

impl Drop for FlushReset {
    fn drop(&mut self) {
        FLUSHING.with(|flag| flag.set(false));
    }
}
