//! Surface Node Boundary
//!
//! The core never touches a concrete visual primitive. Everything it
//! renders into is an opaque "surface node" owned by a backend (a real
//! DOM, a terminal grid, an in-memory tree in tests) that implements
//! the [`Surface`] trait.
//!
//! # Identity
//!
//! Surface nodes are handled through [`SurfaceHandle`], a shared
//! pointer to a trait object. Node identity is pointer identity:
//! reconciliation reuses *the same handle*, never a recreated
//! equivalent, and backends compare children with [`Rc::ptr_eq`].
//!
//! # Contract
//!
//! The core is strict about what it asks of a backend and lenient
//! about what it assumes. In particular:
//!
//! - `insert_at` must behave like an anchored insert-before: capture
//!   the child currently at `index` as the anchor, then move the new
//!   child before that anchor. An index past the end appends. A child
//!   that is already present is *moved*, never duplicated.
//! - `remove_child` must ignore handles that are not children.
//!
//! Backends are single-threaded; handles are `Rc` and never cross
//! threads.

use std::rc::Rc;

/// Shared handle to an opaque surface node.
pub type SurfaceHandle = Rc<dyn Surface>;

/// The operations a backend must provide on its nodes.
pub trait Surface {
    /// Mint an empty child-bearing node in the same backend as `self`.
    ///
    /// List views use this to obtain a dedicated container for their
    /// item nodes.
    fn spawn_group(&self) -> SurfaceHandle;

    /// Mint an inert node carrying `text` in the same backend as
    /// `self`.
    ///
    /// The runtime substitutes such nodes for failed renders so the
    /// surface tree stays structurally valid and the failure is
    /// visible.
    fn spawn_text(&self, text: &str) -> SurfaceHandle;

    /// Attach `child` as the last child of `self`.
    fn append(&self, child: &SurfaceHandle);

    /// Move `child` before the child currently at `index`.
    ///
    /// The anchor is captured *before* `child` is detached from any
    /// previous position. An `index` at or past the current child
    /// count appends.
    fn insert_at(&self, child: &SurfaceHandle, index: usize);

    /// Detach `child` from `self`. Handles that are not children of
    /// `self` are ignored.
    fn remove_child(&self, child: &SurfaceHandle);

    /// Detach every child of `self`.
    fn clear(&self);

    /// Number of children currently attached to `self`.
    fn child_count(&self) -> usize;
}

/// Whether two handles refer to the same surface node.
pub fn same_node(a: &SurfaceHandle, b: &SurfaceHandle) -> bool {
    Rc::ptr_eq(a, b)
}
