//! Subscriptions
//!
//! Subscribing to a signal yields a [`Subscription`] handle. The
//! handle owns nothing: it carries only the information needed to
//! remove the callback later, so it stays safe to use after the
//! signal itself is gone.

use std::sync::atomic::{AtomicU64, Ordering};

/// Unique identifier for one `subscribe` call.
///
/// Registration is identity-keyed: subscribing the same callback twice
/// yields two independent subscriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Generate a new unique subscription ID.
    pub(crate) fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Handle that removes a subscriber from its signal.
///
/// `unsubscribe` is idempotent and safe to call after the signal has
/// been dropped. Dropping the handle does *not* unsubscribe.
#[must_use = "dropping the handle leaves the subscription live; call unsubscribe to remove it"]
pub struct Subscription {
    id: SubscriptionId,
    cancel: Box<dyn Fn()>,
}

impl Subscription {
    pub(crate) fn new<F>(id: SubscriptionId, cancel: F) -> Self
    where
        F: Fn() + 'static,
    {
        Self {
            id,
            cancel: Box::new(cancel),
        }
    }

    /// This subscription's unique ID.
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Remove the callback from the signal's subscriber set.
    pub fn unsubscribe(&self) {
        (self.cancel)();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscription_ids_are_unique() {
        let a = SubscriptionId::new();
        let b = SubscriptionId::new();
        let c = SubscriptionId::new();

        assert_ne!(a, b);
        assert_ne!(b, c);
        assert_ne!(a, c);
    }

    #[test]
    fn unsubscribe_invokes_cancel() {
        use std::cell::Cell;
        use std::rc::Rc;

        let calls = Rc::new(Cell::new(0));
        let calls_c = Rc::clone(&calls);
        let sub = Subscription::new(SubscriptionId::new(), move || {
            calls_c.set(calls_c.get() + 1);
        });

        sub.unsubscribe();
        sub.unsubscribe();
        assert_eq!(calls.get(), 2);
    }
}
