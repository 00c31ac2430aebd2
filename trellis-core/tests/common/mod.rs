//! In-memory surface backend shared by the integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use trellis_core::{Surface, SurfaceHandle};

#[derive(Default)]
struct Registry {
    nodes: RefCell<Vec<Rc<Node>>>,
}

/// A surface node that records its text and children, with a shared
/// registry so handles can be mapped back to concrete nodes.
pub struct Node {
    registry: Rc<Registry>,
    text: String,
    children: RefCell<Vec<SurfaceHandle>>,
}

impl Node {
    pub fn root() -> Rc<Self> {
        let registry = Rc::new(Registry::default());
        let node = Rc::new(Self {
            registry: Rc::clone(&registry),
            text: String::new(),
            children: RefCell::new(Vec::new()),
        });
        registry.nodes.borrow_mut().push(Rc::clone(&node));
        node
    }

    fn spawn(&self, text: &str) -> Rc<Self> {
        let node = Rc::new(Self {
            registry: Rc::clone(&self.registry),
            text: text.to_string(),
            children: RefCell::new(Vec::new()),
        });
        self.registry.nodes.borrow_mut().push(Rc::clone(&node));
        node
    }

    pub fn handle(self: &Rc<Self>) -> SurfaceHandle {
        Rc::clone(self) as SurfaceHandle
    }

    pub fn concrete_of(&self, handle: &SurfaceHandle) -> Option<Rc<Node>> {
        let target = Rc::as_ptr(handle) as *const ();
        self.registry
            .nodes
            .borrow()
            .iter()
            .find(|n| Rc::as_ptr(n) as *const () == target)
            .map(Rc::clone)
    }

    pub fn text_of(&self, handle: &SurfaceHandle) -> String {
        self.concrete_of(handle)
            .map(|n| n.text.clone())
            .unwrap_or_default()
    }

    pub fn child_handles(&self) -> Vec<SurfaceHandle> {
        self.children.borrow().clone()
    }

    pub fn child_texts(&self) -> Vec<String> {
        self.child_handles()
            .iter()
            .map(|c| self.text_of(c))
            .collect()
    }

    /// The children of this node's first child — where a list view
    /// mounted into this node keeps its item nodes.
    pub fn grandchild_handles(&self) -> Vec<SurfaceHandle> {
        self.children
            .borrow()
            .first()
            .and_then(|c| self.concrete_of(c))
            .map(|n| n.child_handles())
            .unwrap_or_default()
    }

    pub fn grandchild_texts(&self) -> Vec<String> {
        self.grandchild_handles()
            .iter()
            .map(|c| self.text_of(c))
            .collect()
    }

    /// Texts of the leaf nodes under each grandchild, flattened. An
    /// item slot that wraps a mounted child component reports the
    /// child's text.
    pub fn grandchild_leaf_texts(&self) -> Vec<String> {
        self.grandchild_handles()
            .iter()
            .filter_map(|slot| self.concrete_of(slot))
            .flat_map(|slot| slot.child_texts())
            .collect()
    }

    pub fn child_len(&self) -> usize {
        self.children.borrow().len()
    }
}

impl Surface for Node {
    fn spawn_group(&self) -> SurfaceHandle {
        self.spawn("")
    }

    fn spawn_text(&self, text: &str) -> SurfaceHandle {
        self.spawn(text)
    }

    fn append(&self, child: &SurfaceHandle) {
        self.remove_child(child);
        self.children.borrow_mut().push(Rc::clone(child));
    }

    fn insert_at(&self, child: &SurfaceHandle, index: usize) {
        let mut children = self.children.borrow_mut();
        let anchor = children.get(index).cloned();

        if let Some(anchor) = &anchor {
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
