//! Keyed List Reconciliation
//!
//! Keeps a rendered collection in sync with a signal carrying an
//! ordered list, reusing per-item renderings by key.

mod each;
mod item;
mod key;
mod reconcile;

pub use each::{each, each_indexed};
pub use item::{Cleanup, ItemRender};
pub use key::Key;
