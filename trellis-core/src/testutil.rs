//! In-memory surface backend for unit tests.
//!
//! Nodes register themselves in a shared registry so tests can map an
//! opaque [`SurfaceHandle`] back to its concrete node and read texts
//! and child order.

use std::cell::RefCell;
use std::rc::Rc;

use crate::surface::{Surface, SurfaceHandle};

/// Every node spawned from one root, for handle→node lookups.
#[derive(Default)]
struct Registry {
    nodes: RefCell<Vec<Rc<TestNode>>>,
}

pub(crate) struct TestNode {
    registry: Rc<Registry>,
    text: String,
    children: RefCell<Vec<SurfaceHandle>>,
}

impl TestNode {
    /// A fresh root node with its own registry.
    pub(crate) fn root() -> Rc<Self> {
        let registry = Rc::new(Registry::default());
        let node = Rc::new(Self {
            registry: Rc::clone(&registry),
            text: String::new(),
            children: RefCell::new(Vec::new()),
        });
        registry.nodes.borrow_mut().push(Rc::clone(&node));
        node
    }

    /// A detached node sharing `peer`'s registry.
    pub(crate) fn new_detached(peer: &Rc<Self>) -> Rc<Self> {
        peer.spawn_concrete("")
    }

    fn spawn_concrete(&self, text: &str) -> Rc<Self> {
        let node = Rc::new(Self {
            registry: Rc::clone(&self.registry),
            text: text.to_string(),
            children: RefCell::new(Vec::new()),
        });
        self.registry.nodes.borrow_mut().push(Rc::clone(&node));
        node
    }

    /// This node as an opaque handle.
    pub(crate) fn handle(self: &Rc<Self>) -> SurfaceHandle {
        Rc::clone(self) as SurfaceHandle
    }

    fn concrete_of(&self, handle: &SurfaceHandle) -> Option<Rc<TestNode>> {
        let target = Rc::as_ptr(handle) as *const ();
        self.registry
            .nodes
            .borrow()
            .iter()
            .find(|n| Rc::as_ptr(n) as *const () == target)
            .map(Rc::clone)
    }

    /// Texts of this node's children, in order.
    pub(crate) fn child_texts(&self) -> Vec<String> {
        self.children
            .borrow()
            .iter()
            .map(|c| {
                self.concrete_of(c)
                    .map(|n| n.text.clone())
                    .unwrap_or_default()
            })
            .collect()
    }

    /// Texts of the first child's children — the item nodes of a list
    /// view mounted into this node.
    pub(crate) fn grandchild_texts(&self) -> Vec<String> {
        self.children
            .borrow()
            .first()
            .and_then(|c| self.concrete_of(c))
            .map(|n| n.child_texts())
            .unwrap_or_default()
    }

    /// Child count without going through the trait object.
    pub(crate) fn child_count_concrete(&self) -> usize {
        self.children.borrow().len()
    }
}

impl Surface for TestNode {
    fn spawn_group(&self) -> SurfaceHandle {
        self.spawn_concrete("")
    }

    fn spawn_text(&self, text: &str) -> SurfaceHandle {
        self.spawn_concrete(text)
    }

    fn append(&self, child: &SurfaceHandle) {
        self.remove_child(child);
        self.children.borrow_mut().push(Rc::clone(child));
    }

    fn insert_at(&self, child: &SurfaceHandle, index: usize) {
        let mut children = self.children.borrow_mut();
        let anchor = children.get(index).cloned();

        if let Some(anchor) = &anchor {
            // Inserting a node before itself is a no-op.
            if Rc::ptr_eq(anchor, child) {
                return;
            }
        }

        children.retain(|c| !Rc::ptr_eq(c, child));
        let at = match &anchor {
            Some(anchor) => children
                .iter()
                .position(|c| Rc::ptr_eq(c, anchor))
                .unwrap_or(children.len()),
            None => children.len(),
        };
        children.insert(at, Rc::clone(child));
    }

    fn remove_child(&self, child: &SurfaceHandle) {
        self.children.borrow_mut().retain(|c| !Rc::ptr_eq(c, child));
    }

    fn clear(&self) {
        self.children.borrow_mut().clear();
    }

    fn child_count(&self) -> usize {
        self.children.borrow().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_at_moves_existing_children() {
        let root = TestNode::root();
        let handle = root.handle();
        let a = handle.spawn_text("a");
        let b = handle.spawn_text("b");
        let c = handle.spawn_text("c");
        handle.append(&a);
        handle.append(&b);
        handle.append(&c);

        // Move "c" to the front: anchored before the child at 0.
        handle.insert_at(&c, 0);
        assert_eq!(root.child_texts(), ["c", "a", "b"]);

        // Past-the-end index appends.
        handle.insert_at(&c, 10);
        assert_eq!(root.child_texts(), ["a", "b", "c"]);

        // Inserting at a node's own position leaves order unchanged.
        handle.insert_at(&b, 1);
        assert_eq!(root.child_texts(), ["a", "b", "c"]);
    }

    #[test]
    fn remove_child_ignores_strangers() {
        let root = TestNode::root();
        let handle = root.handle();
        let a = handle.spawn_text("a");
        handle.append(&a);

        let stranger = handle.spawn_text("stranger");
        handle.remove_child(&stranger);
        assert_eq!(root.child_texts(), ["a"]);
    }
}
