//! Component Instances
//!
//! An [`Instance`] is the runtime record of one mounted component: its
//! place in the tree, its lifecycle hooks, and the surface node it
//! produced. Ownership flows strictly parent→child — an instance holds
//! its children strongly and its parent weakly, so destroying a parent
//! releases the whole subtree.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use smallvec::SmallVec;

use crate::error::BoxError;
use crate::surface::SurfaceHandle;

/// Unique identifier for an instance, used in spans and error reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstanceId(u64);

impl InstanceId {
    /// Generate a new unique instance ID.
    fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// A lifecycle hook. Runs exactly once; failures are reported, not
/// propagated.
pub(crate) type Hook = Box<dyn FnOnce() -> Result<(), BoxError>>;

type Children = SmallVec<[Rc<Instance>; 4]>;
type Hooks = SmallVec<[Hook; 2]>;

/// The runtime record of one mounted component.
pub struct Instance {
    id: InstanceId,
    /// Component type name, for diagnostics.
    component: &'static str,
    /// Weak: ownership flows parent→child, never the reverse.
    parent: Weak<Instance>,
    /// Mount order. Destroyed in reverse.
    children: RefCell<Children>,
    mount_hooks: RefCell<Hooks>,
    destroy_hooks: RefCell<Hooks>,
    /// The surface node this component produced.
    node: RefCell<Option<SurfaceHandle>>,
    /// The container the node was attached to, recorded so destroy can
    /// detach it.
    attached_to: RefCell<Option<SurfaceHandle>>,
    /// Once set, never resets.
    destroyed: Cell<bool>,
}

impl Instance {
    /// Create a fresh, unmounted instance.
    pub(crate) fn new(component: &'static str, parent: Option<&Rc<Instance>>) -> Rc<Self> {
        Rc::new(Self {
            id: InstanceId::new(),
            component,
            parent: parent.map(Rc::downgrade).unwrap_or_default(),
            children: RefCell::new(SmallVec::new()),
            mount_hooks: RefCell::new(SmallVec::new()),
            destroy_hooks: RefCell::new(SmallVec::new()),
            node: RefCell::new(None),
            attached_to: RefCell::new(None),
            destroyed: Cell::new(false),
        })
    }

    /// This instance's unique ID.
    pub fn id(&self) -> InstanceId {
        self.id
    }

    /// The component's type name.
    pub fn component(&self) -> &'static str {
        self.component
    }

    /// Whether `destroy` has begun on this instance.
    pub fn is_destroyed(&self) -> bool {
        self.destroyed.get()
    }

    /// Number of live child instances.
    pub fn child_count(&self) -> usize {
        self.children.borrow().len()
    }

    /// Set the destroyed flag, returning its previous value.
    pub(crate) fn mark_destroyed(&self) -> bool {
        self.destroyed.replace(true)
    }

    /// Append `child` to the child sequence (ownership transfer).
    pub(crate) fn adopt(&self, child: Rc<Instance>) {
        self.children.borrow_mut().push(child);
    }

    /// Remove and return the most recently mounted live child.
    pub(crate) fn pop_child(&self) -> Option<Rc<Instance>> {
        self.children.borrow_mut().pop()
    }

    /// Drop `child` from the child sequence, if present.
    pub(crate) fn unlink_child(&self, child: &Instance) {
        self.children
            .borrow_mut()
            .retain(|c| !std::ptr::eq(Rc::as_ptr(c), child));
    }

    /// The parent instance, if it is still alive.
    pub(crate) fn parent(&self) -> Option<Rc<Instance>> {
        self.parent.upgrade()
    }

    pub(crate) fn push_mount_hook(&self, hook: Hook) {
        self.mount_hooks.borrow_mut().push(hook);
    }

    pub(crate) fn push_destroy_hook(&self, hook: Hook) {
        self.destroy_hooks.borrow_mut().push(hook);
    }

    /// Take the mount hooks for their single execution.
    pub(crate) fn take_mount_hooks(&self) -> Hooks {
        std::mem::take(&mut *self.mount_hooks.borrow_mut())
    }

    /// Take the destroy hooks for their single execution.
    pub(crate) fn take_destroy_hooks(&self) -> Hooks {
        std::mem::take(&mut *self.destroy_hooks.borrow_mut())
    }

    /// Record the surface node this component produced.
    pub(crate) fn set_node(&self, node: SurfaceHandle) {
        *self.node.borrow_mut() = Some(node);
    }

    /// Record the container the node was attached to.
    pub(crate) fn set_attached_to(&self, container: SurfaceHandle) {
        *self.attached_to.borrow_mut() = Some(container);
    }

    /// Release the surface node reference.
    pub(crate) fn take_node(&self) -> Option<SurfaceHandle> {
        self.node.borrow_mut().take()
    }

    /// Release the container reference.
    pub(crate) fn take_attached_to(&self) -> Option<SurfaceHandle> {
        self.attached_to.borrow_mut().take()
    }
}

impl std::fmt::Debug for Instance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Instance")
            .field("id", &self.id)
            .field("component", &self.component)
            .field("children", &self.child_count())
            .field("destroyed", &self.is_destroyed())
            .finish()
    }
}
