//! Reactive Primitives
//!
//! The signal value cell, its subscription handles, and the deferred
//! task queue notification runs on.

pub mod scheduler;
mod signal;
mod subscriber;

pub use signal::{signal, Signal};
pub use subscriber::{Subscription, SubscriptionId};
