//! Mounting and Destroying Components
//!
//! This module is the sole authority for constructing and tearing down
//! instances; lifecycle hooks and the list reconciler build on it.
//!
//! # How Mounting Works
//!
//! 1. A fresh instance is allocated and, if a parent is known, linked
//!    into the parent's child sequence.
//!
//! 2. The component function runs with the instance pushed as the
//!    current construction context (popped on every exit path by the
//!    guard). Hook registrations and `mount_child` calls inside the
//!    function attach to this instance.
//!
//! 3. A failing component is reported and replaced with a visible
//!    placeholder node, so the tree stays structurally valid.
//!
//! 4. Mount hooks run in registration order, then the node is attached
//!    to the container.
//!
//! # How Destruction Works
//!
//! Destruction is depth-first and bottom-up: children in reverse mount
//! order, each fully torn down before the next, then the instance's
//! own destroy hooks, then surface detach and parent unlink. A repeat
//! destroy is a silent no-op.

use std::rc::Rc;

use crate::error::{strictness, BoxError, RuntimeError, Strictness};
use crate::report::run_reported;
use crate::runtime::context::{self, ContextGuard};
use crate::runtime::instance::Instance;
use crate::surface::{Surface, SurfaceHandle};

/// What a component function produces: its surface node, or a failure
/// that the runtime turns into a visible placeholder.
pub type ComponentResult = Result<SurfaceHandle, BoxError>;

/// Handle returned by [`mount`]: the destroy procedure bound to one
/// specific instance.
///
/// Dropping the handle does *not* destroy the component — a parent
/// that owns the lifetime may simply discard it.
pub struct MountHandle {
    instance: Rc<Instance>,
}

impl MountHandle {
    /// Tear down this component and its whole subtree. Idempotent.
    pub fn destroy(&self) {
        destroy(&self.instance);
    }

    /// Whether the component has been destroyed.
    pub fn is_destroyed(&self) -> bool {
        self.instance.is_destroyed()
    }
}

impl std::fmt::Debug for MountHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MountHandle")
            .field("instance", &self.instance)
            .finish()
    }
}

/// Mount a root-level component into `container`.
pub fn mount<P, F>(component: F, container: &SurfaceHandle, props: P) -> MountHandle
where
    F: FnOnce(P) -> ComponentResult,
{
    mount_at(component, container, None, props)
}

/// Mount a component under the currently constructing parent.
///
/// With no component under construction this is a usage error; in
/// `Relaxed` mode it degrades to a warning plus a root-level mount.
pub fn mount_child<P, F>(
    component: F,
    container: &SurfaceHandle,
    props: P,
) -> Result<MountHandle, RuntimeError>
where
    F: FnOnce(P) -> ComponentResult,
{
    match context::current() {
        Some(parent) => Ok(mount_at(component, container, Some(parent), props)),
        None => match strictness() {
            Strictness::Strict => Err(RuntimeError::NoActiveComponent("mount_child")),
            Strictness::Relaxed => {
                tracing::warn!(
                    target: "trellis",
                    "mount_child called outside a component; mounting at the root"
                );
                Ok(mount_at(component, container, None, props))
            }
        },
    }
}

/// Shared mount path for root and child mounts.
fn mount_at<P, F>(
    component: F,
    container: &SurfaceHandle,
    parent: Option<Rc<Instance>>,
    props: P,
) -> MountHandle
where
    F: FnOnce(P) -> ComponentResult,
{
    let name = std::any::type_name::<F>();
    let instance = Instance::new(name, parent.as_ref());
    let _span =
        tracing::trace_span!("mount", component = name, id = instance.id().raw()).entered();

    if let Some(parent) = &parent {
        parent.adopt(Rc::clone(&instance));
    }

    // Run the component with this instance as the construction
    // context. The guard restores the stack on every exit path.
    let rendered = {
        let _ctx = ContextGuard::enter(Rc::clone(&instance));
        component(props)
    };

    let node = match rendered {
        Ok(node) => node,
        Err(error) => {
            tracing::error!(
                target: "trellis",
                component = name,
                cause = %error,
                "component render failed"
            );
            container.spawn_text(&error.to_string())
        }
    };

    instance.set_node(Rc::clone(&node));

    // Mount hooks see the finished node but run before attachment.
    for hook in instance.take_mount_hooks() {
        run_reported(&format!("mount hook in <{name}>"), hook);
    }

    container.append(&node);
    instance.set_attached_to(Rc::clone(container));

    tracing::trace!(target: "trellis", component = name, "mounted");
    MountHandle { instance }
}

/// Tear down `instance` and its subtree.
pub(crate) fn destroy(instance: &Rc<Instance>) {
    // Mark before recursing so reentrant destroys from within hooks
    // observe the flag already set.
    if instance.mark_destroyed() {
        return;
    }

    let name = instance.component();
    let _span =
        tracing::trace_span!("destroy", component = name, id = instance.id().raw()).entered();

    // Children first, reverse of mount order, each subtree fully.
    while let Some(child) = instance.pop_child() {
        destroy(&child);
    }

    for hook in instance.take_destroy_hooks() {
        run_reported(&format!("destroy hook in <{name}>"), hook);
    }

    // Detach the node if it is still where we put it.
    if let (Some(node), Some(container)) = (instance.take_node(), instance.take_attached_to()) {
        container.remove_child(&node);
    }

    if let Some(parent) = instance.parent() {
        parent.unlink_child(instance);
    }

    tracing::trace!(target: "trellis", component = name, "destroyed");
}
