//! Signal Implementation
//!
//! A Signal is the reactive primitive of the runtime: a value cell
//! whose subscribers are told when the value changes.
//!
//! # How Signals Work
//!
//! 1. `get` reads the current value synchronously and never triggers
//!    notification.
//!
//! 2. `subscribe` registers a callback and invokes it once,
//!    synchronously, with the then-current value — new subscribers
//!    need no separate "read current value" step.
//!
//! 3. `set` with a different value replaces it immediately (subsequent
//!    `get` calls see it right away) and schedules one notification
//!    pass on the deferred task queue.
//!
//! # Notification Semantics
//!
//! Same-turn `set` calls coalesce: a signal never has more than one
//! pass pending, and the pass reads the value current at flush time.
//! Subscribers therefore observe only the settled value, exactly once
//! per turn — never stale intermediates, never redundant passes.
//!
//! Notification iterates a snapshot of the subscriber list, so
//! callbacks may freely subscribe, unsubscribe, or `set` reentrantly.
//! One callback's failure is reported and does not stop the rest.

use std::cell::{Cell, RefCell};
use std::fmt::Debug;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::BoxError;
use crate::reactive::scheduler;
use crate::reactive::subscriber::{Subscription, SubscriptionId};

/// Counter for generating unique signal IDs.
static SIGNAL_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate a new unique signal ID.
fn next_signal_id() -> u64 {
    SIGNAL_ID_COUNTER.fetch_add(1, Ordering::Relaxed)
}

type SubscriberFn<T> = dyn Fn(&T) -> Result<(), BoxError>;

/// Shared state behind a signal and all of its clones.
struct SignalInner<T> {
    value: RefCell<T>,
    subscribers: RefCell<Vec<(SubscriptionId, Rc<SubscriberFn<T>>)>>,
    /// Whether a notification pass is already waiting on the queue.
    notify_queued: Cell<bool>,
}

/// A reactive value cell.
///
/// Cloning a signal is cheap and shares state: every clone reads and
/// writes the same value and the same subscriber set.
///
/// # Example
///
/// ```rust,ignore
/// let count = signal(0);
///
/// let sub = count.subscribe(|v| {
///     println!("count is {v}");
///     Ok(())
/// });
///
/// count.set(5);
/// scheduler::flush(); // subscribers observe 5 here
/// sub.unsubscribe();
/// ```
pub struct Signal<T>
where
    T: Clone + 'static,
{
    /// Unique identifier for this signal, for diagnostics.
    id: u64,
    inner: Rc<SignalInner<T>>,
}

impl<T> Signal<T>
where
    T: Clone + 'static,
{
    /// Create a new signal with the given initial value.
    pub fn new(initial: T) -> Self {
        Self {
            id: next_signal_id(),
            inner: Rc::new(SignalInner {
                value: RefCell::new(initial),
                subscribers: RefCell::new(Vec::new()),
                notify_queued: Cell::new(false),
            }),
        }
    }

    /// Get the signal's unique ID.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Get the current value. Never notifies, never suspends.
    pub fn get(&self) -> T {
        self.inner.value.borrow().clone()
    }

    /// Set a new value and schedule subscriber notification.
    ///
    /// Setting a value equal to the current one is a no-op: nothing is
    /// stored and nothing is scheduled.
    pub fn set(&self, value: T)
    where
        T: PartialEq,
    {
        if *self.inner.value.borrow() == value {
            return;
        }
        *self.inner.value.borrow_mut() = value;
        self.schedule_notify();
    }

    /// Update the value using a function.
    ///
    /// This is useful for updates that depend on the current value.
    pub fn update<F>(&self, f: F)
    where
        T: PartialEq,
        F: FnOnce(&T) -> T,
    {
        let new_value = {
            let guard = self.inner.value.borrow();
            f(&guard)
        };
        self.set(new_value);
    }

    /// Register a change callback.
    ///
    /// The callback runs once immediately with the current value, then
    /// on every (deferred) notification pass until unsubscribed. A
    /// failure from any invocation, the immediate one included, is
    /// reported and not propagated.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) -> Result<(), BoxError> + 'static,
    {
        let id = SubscriptionId::new();
        let callback: Rc<SubscriberFn<T>> = Rc::new(callback);
        self.inner
            .subscribers
            .borrow_mut()
            .push((id, Rc::clone(&callback)));

        // Immediate synchronous delivery of the current value. The
        // value is cloned out first so the callback may re-enter the
        // signal.
        let current = self.get();
        if let Err(error) = callback(&current) {
            report_subscriber_failure(id, &error);
        }

        let weak = Rc::downgrade(&self.inner);
        Subscription::new(id, move || {
            if let Some(inner) = weak.upgrade() {
                inner.subscribers.borrow_mut().retain(|(sid, _)| *sid != id);
            }
        })
    }

    /// Get the number of subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.borrow().len()
    }

    /// Queue one notification pass, unless one is already waiting.
    fn schedule_notify(&self) {
        if self.inner.notify_queued.replace(true) {
            return;
        }
        let weak: Weak<SignalInner<T>> = Rc::downgrade(&self.inner);
        scheduler::enqueue(move || {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            // Clear before delivering: a `set` from inside a callback
            // schedules a fresh pass.
            inner.notify_queued.set(false);

            let value = inner.value.borrow().clone();
            // Snapshot: mutation of the subscriber set from within a
            // callback must not corrupt this pass.
            let snapshot = inner.subscribers.borrow().clone();
            for (id, callback) in snapshot {
                if let Err(error) = callback(&value) {
                    report_subscriber_failure(id, &error);
                }
            }
        });
    }
}

fn report_subscriber_failure(id: SubscriptionId, error: &BoxError) {
    tracing::error!(
        target: "trellis",
        subscription = id.raw(),
        cause = %error,
        "signal subscriber failed"
    );
}

/// Create a reactive signal. Shorthand for [`Signal::new`].
pub fn signal<T>(initial: T) -> Signal<T>
where
    T: Clone + 'static,
{
    Signal::new(initial)
}

impl<T> Clone for Signal<T>
where
    T: Clone + 'static,
{
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> Debug for Signal<T>
where
    T: Clone + Debug + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("id", &self.id)
            .field("value", &self.inner.value.borrow())
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
