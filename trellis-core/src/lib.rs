//! Trellis Core
//!
//! This crate provides the core runtime for the Trellis reactive UI
//! framework. It implements:
//!
//! - The component instance tree with mount/destroy lifecycle
//! - Signals: value cells with deferred, coalesced notification
//! - Keyed list reconciliation with node reuse
//!
//! The visual primitive is deliberately opaque: components produce
//! and attach *surface nodes* through the [`Surface`] trait, and any
//! backend that implements it (a DOM, a terminal, an in-memory tree)
//! can host the runtime.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - `runtime`: the instance tree, construction context, lifecycle
//!   hooks
//! - `reactive`: the signal primitive and the deferred task queue
//! - `list`: keyed reconciliation over a signal of items
//! - `error`: error taxonomy, severity, and the strictness policy
//!
//! # Example
//!
//! ```rust,ignore
//! use trellis_core::{each, flush, mount, on_destroy, signal, ItemRender, Key};
//!
//! let names = signal(vec!["Alpha".to_string(), "Beta".to_string()]);
//!
//! let handle = mount(
//!     |host: SurfaceHandle| {
//!         let list = host.spawn_group();
//!         each(
//!             &names,
//!             &list,
//!             |name, _| Ok(ItemRender::new(render_row(name)?)),
//!             |name, _| Key::from(name.as_str()),
//!         )?;
//!         Ok(list)
//!     },
//!     &root,
//!     root.clone(),
//! );
//!
//! names.set(vec!["Beta".to_string(), "Gamma".to_string()]);
//! flush(); // Beta's row is reused, Alpha's torn down, Gamma's created
//!
//! handle.destroy();
//! ```

pub mod error;
pub mod list;
pub mod reactive;
mod report;
pub mod runtime;
pub mod surface;

#[cfg(test)]
pub(crate) mod testutil;

pub use error::{set_strictness, strictness, BoxError, RuntimeError, Severity, Strictness};
pub use list::{each, each_indexed, Cleanup, ItemRender, Key};
pub use reactive::scheduler::{flush, pending};
pub use reactive::{signal, Signal, Subscription, SubscriptionId};
pub use runtime::{
    mount, mount_child, on_destroy, on_mount, ComponentResult, Instance, InstanceId, MountHandle,
};
pub use surface::{same_node, Surface, SurfaceHandle};
