//! Item Render Results
//!
//! A render function produces one [`ItemRender`] per list element: the
//! surface node for that slot, plus an optional cleanup that releases
//! whatever the render acquired (nested mounts included). The cleanup
//! runs at most once — the type system enforces it.

use crate::surface::{Surface, SurfaceHandle};
use crate::MountHandle;

/// A single-shot teardown procedure for one rendered item.
pub struct Cleanup {
    run: Box<dyn FnOnce()>,
}

impl Cleanup {
    /// Wrap a teardown closure.
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce() + 'static,
    {
        Self { run: Box::new(f) }
    }

    /// Consume and run the cleanup.
    pub(crate) fn run(self) {
        (self.run)()
    }
}

/// A `mount_child` handle serves directly as an item's cleanup.
impl From<MountHandle> for Cleanup {
    fn from(handle: MountHandle) -> Self {
        Cleanup::new(move || handle.destroy())
    }
}

/// What a render function produced for one list element.
pub struct ItemRender {
    node: SurfaceHandle,
    cleanup: Option<Cleanup>,
}

impl ItemRender {
    /// A rendered node with nothing to clean up.
    pub fn new(node: SurfaceHandle) -> Self {
        Self {
            node,
            cleanup: None,
        }
    }

    /// A rendered node with a teardown procedure.
    pub fn with_cleanup<C>(node: SurfaceHandle, cleanup: C) -> Self
    where
        C: Into<Cleanup>,
    {
        Self {
            node,
            cleanup: Some(cleanup.into()),
        }
    }

    /// The surface node for this slot.
    pub fn node(&self) -> &SurfaceHandle {
        &self.node
    }

    /// Run the cleanup (if any) and detach the node from `container`.
    pub(crate) fn dispose(self, container: &SurfaceHandle) {
        let (node, cleanup) = self.into_parts();
        if let Some(cleanup) = cleanup {
            cleanup.run();
        }
        container.remove_child(&node);
    }

    /// Split into the node and the not-yet-run cleanup.
    pub(crate) fn into_parts(self) -> (SurfaceHandle, Option<Cleanup>) {
        (self.node, self.cleanup)
    }
}

impl std::fmt::Debug for ItemRender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ItemRender")
            .field("has_cleanup", &self.cleanup.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::TestNode;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn dispose_runs_cleanup_then_detaches() {
        let root = TestNode::root();
        let node = root.handle().spawn_text("item");
        root.handle().append(&node);
        assert_eq!(root.child_count_concrete(), 1);

        let ran = Rc::new(Cell::new(false));
        let ran_c = Rc::clone(&ran);
        let item = ItemRender::with_cleanup(node, Cleanup::new(move || ran_c.set(true)));

        item.dispose(&root.handle());
        assert!(ran.get());
        assert_eq!(root.child_count_concrete(), 0);
    }

    #[test]
    fn dispose_without_cleanup_only_detaches() {
        let root = TestNode::root();
        let node = root.handle().spawn_text("item");
        root.handle().append(&node);

        ItemRender::new(node).dispose(&root.handle());
        assert_eq!(root.child_count_concrete(), 0);
    }
}
