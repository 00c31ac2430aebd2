//! Keyed List Views
//!
//! [`each`] keeps a surface-node collection synchronized with a signal
//! carrying an ordered list. It mounts an internal list-view component
//! under the current construction context; the component owns a
//! dedicated group node, subscribes to the signal, and reconciles on
//! every delivered value. Destroying the owning component (or the
//! returned handle) tears the whole view down exactly once.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::error::{BoxError, RuntimeError};
use crate::list::item::ItemRender;
use crate::list::key::Key;
use crate::list::reconcile::{reconcile, ListState};
use crate::reactive::Signal;
use crate::runtime::{context, mount_child, on_destroy, ComponentResult, MountHandle};
use crate::surface::{Surface, SurfaceHandle};

/// Render a keyed, reactive list of `items` into `container`.
///
/// * `render` produces the surface node (and optional cleanup) for one
///   item; it may call `mount_child`, which attaches to the list view.
/// * `key_of` derives each item's identity across renders. Keys must
///   be unique within one pass; a duplicate rejects that pass.
///
/// Requires a component under construction (the list view becomes its
/// child); outside one, the `mount_child` rules of the current
/// strictness apply.
pub fn each<T, R, K>(
    items: &Signal<Vec<T>>,
    container: &SurfaceHandle,
    render: R,
    key_of: K,
) -> Result<MountHandle, RuntimeError>
where
    T: Clone + PartialEq + 'static,
    R: FnMut(&T, usize) -> Result<ItemRender, BoxError> + 'static,
    K: Fn(&T, usize) -> Key + 'static,
{
    let items = items.clone();
    mount_child(
        move |host: SurfaceHandle| list_view(&items, &host, render, key_of),
        container,
        Rc::clone(container),
    )
}

/// [`each`] keyed by list position. Fine for append-only lists; use
/// [`each`] with a stable id whenever items move.
pub fn each_indexed<T, R>(
    items: &Signal<Vec<T>>,
    container: &SurfaceHandle,
    render: R,
) -> Result<MountHandle, RuntimeError>
where
    T: Clone + PartialEq + 'static,
    R: FnMut(&T, usize) -> Result<ItemRender, BoxError> + 'static,
{
    each(items, container, render, |_, index| Key::from(index))
}

/// The internal list-view component body.
fn list_view<T, R, K>(
    items: &Signal<Vec<T>>,
    host: &SurfaceHandle,
    render: R,
    key_of: K,
) -> ComponentResult
where
    T: Clone + PartialEq + 'static,
    R: FnMut(&T, usize) -> Result<ItemRender, BoxError> + 'static,
    K: Fn(&T, usize) -> Key + 'static,
{
    // Dedicated group node: the items never mingle with siblings the
    // consumer may have put in the container.
    let view = host.spawn_group();

    // Captured once: the instance whose children item renders attach
    // to — this list view itself.
    let owner = context::current();

    let state: Rc<RefCell<ListState>> = Rc::new(RefCell::new(ListState::new()));
    let cleaned = Rc::new(Cell::new(false));
    let render = RefCell::new(render);

    let subscription = {
        let view = Rc::clone(&view);
        let owner = owner.clone();
        let state = Rc::clone(&state);
        let cleaned = Rc::clone(&cleaned);
        items.subscribe(move |items: &Vec<T>| {
            if cleaned.get() {
                return Ok(());
            }
            let mut render = render.borrow_mut();
            reconcile(
                &view,
                owner.as_ref(),
                items,
                &mut *render,
                &key_of,
                &mut state.borrow_mut(),
            )
            .map_err(Into::into)
        })
    };

    {
        let view = Rc::clone(&view);
        on_destroy(move || {
            // Idempotent: the flag also stops any in-flight passes
            // still queued behind this teardown.
            if cleaned.replace(true) {
                return Ok(());
            }
            subscription.unsubscribe();
            for (_key, entry) in state.borrow_mut().drain(..) {
                let (_node, cleanup) = entry.into_parts();
                if let Some(cleanup) = cleanup {
                    cleanup.run();
                }
            }
            view.clear();
            Ok(())
        })?;
    }

    Ok(view)
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
