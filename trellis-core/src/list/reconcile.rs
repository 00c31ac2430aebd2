//! Keyed Reconciliation
//!
//! One pass maps a new list of items onto the existing rendered
//! collection with minimal churn:
//!
//! 1. Compute the key of every item, in order. A duplicate rejects the
//!    whole pass — the previous state and the surface stay untouched.
//! 2. Walk the keys in new-list order. A key seen last pass keeps its
//!    node: the entry moves into the next state map and the node is
//!    repositioned in place. A new key renders fresh, with the owning
//!    instance restored as construction context so the render function
//!    may call `mount_child`.
//! 3. A failing render yields a visible placeholder for that slot; the
//!    pass continues.
//! 4. Whatever is left of the previous state is stale: cleanups run
//!    and nodes detach — after insertion, so a node shared between
//!    passes is never removed and recreated.
//! 5. The next state replaces the previous one wholesale.

use std::rc::Rc;

use indexmap::{IndexMap, IndexSet};
use smallvec::SmallVec;

use crate::error::{BoxError, RuntimeError};
use crate::list::item::ItemRender;
use crate::list::key::Key;
use crate::runtime::context::ContextGuard;
use crate::runtime::Instance;
use crate::surface::{Surface, SurfaceHandle};

/// The render-result mapping owned by one list view.
pub(crate) type ListState = IndexMap<Key, ItemRender>;

/// A caller-supplied render function for one list element.
pub(crate) type RenderFn<'a, T> = dyn FnMut(&T, usize) -> Result<ItemRender, BoxError> + 'a;

type Keys = SmallVec<[Key; 8]>;

/// Run one reconciliation pass over `items`, updating `state` and the
/// children of `view` in place.
///
/// On a duplicate key the pass is rejected: the error is returned and
/// `state` is left exactly as it was.
pub(crate) fn reconcile<T>(
    view: &SurfaceHandle,
    owner: Option<&Rc<Instance>>,
    items: &[T],
    render: &mut RenderFn<'_, T>,
    key_of: &dyn Fn(&T, usize) -> Key,
    state: &mut ListState,
) -> Result<(), RuntimeError> {
    let keys = collect_keys(items, key_of)?;

    let mut previous = std::mem::take(state);
    let mut next = ListState::with_capacity(keys.len());

    reuse_existing(view, &mut previous, &keys, &mut next);
    create_missing(view, owner, items, &keys, render, &mut next);
    remove_stale(view, previous);

    *state = next;
    Ok(())
}

/// Compute the ordered key sequence for the next render, rejecting
/// duplicates within the pass.
fn collect_keys<T>(items: &[T], key_of: &dyn Fn(&T, usize) -> Key) -> Result<Keys, RuntimeError> {
    let mut keys = Keys::with_capacity(items.len());
    let mut seen: IndexSet<Key> = IndexSet::with_capacity(items.len());

    for (index, item) in items.iter().enumerate() {
        let key = key_of(item, index);
        if !seen.insert(key.clone()) {
            return Err(RuntimeError::DuplicateKey(key));
        }
        keys.push(key);
    }

    Ok(keys)
}

/// Move entries that survive this pass into `next`, repositioning
/// their nodes. Render logic is not re-invoked for these.
fn reuse_existing(view: &SurfaceHandle, previous: &mut ListState, keys: &[Key], next: &mut ListState) {
    for (index, key) in keys.iter().enumerate() {
        if let Some(entry) = previous.swap_remove(key) {
            view.insert_at(entry.node(), index);
            tracing::trace!(target: "trellis", %key, index, "list entry reused");
            next.insert(key.clone(), entry);
        }
    }
}

/// Render entries for keys that did not exist last pass and insert
/// their nodes at the right position.
fn create_missing<T>(
    view: &SurfaceHandle,
    owner: Option<&Rc<Instance>>,
    items: &[T],
    keys: &[Key],
    render: &mut RenderFn<'_, T>,
    next: &mut ListState,
) {
    for (index, key) in keys.iter().enumerate() {
        if next.contains_key(key) {
            continue; // reused
        }

        // Restore the owning instance as construction context so the
        // render function may register children against it.
        let rendered = {
            let _ctx = owner.map(|owner| ContextGuard::enter(Rc::clone(owner)));
            render(&items[index], index)
        };

        let entry = match rendered {
            Ok(entry) => entry,
            Err(error) => {
                tracing::error!(target: "trellis", %key, cause = %error, "list render failed");
                ItemRender::new(view.spawn_text(&error.to_string()))
            }
        };

        view.insert_at(entry.node(), index);
        tracing::trace!(target: "trellis", %key, index, "list entry created");
        next.insert(key.clone(), entry);
    }
}

/// Tear down entries whose keys disappeared this pass.
fn remove_stale(view: &SurfaceHandle, previous: ListState) {
    for (key, entry) in previous {
        tracing::trace!(target: "trellis", %key, "list entry removed");
        entry.dispose(view);
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
