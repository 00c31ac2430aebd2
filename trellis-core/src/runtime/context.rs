//! Construction Context
//!
//! The context stack tracks which instance is currently under
//! construction. This lets nested calls — hook registration,
//! `mount_child`, a list item's render function — find their owner
//! without threading a parameter through every call.
//!
//! # Implementation
//!
//! A thread-local stack of instances. Entering a construction pushes;
//! the returned guard pops on drop, so the stack is restored on every
//! exit path. Construction is fully synchronous, so the stack is never
//! shared across concurrent mounts: each thread owns its own.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::{strictness, Strictness};
use crate::runtime::instance::{Instance, InstanceId};

thread_local! {
    static CONTEXT_STACK: RefCell<Vec<Rc<Instance>>> = RefCell::new(Vec::new());
}

/// Guard that pops the context when dropped.
///
/// This keeps the stack balanced even when construction bails out
/// early — a stale top-of-stack entry would misattribute hooks and
/// children to the wrong instance.
pub(crate) struct ContextGuard {
    instance_id: InstanceId,
}

impl ContextGuard {
    /// Push `instance` as the current construction context.
    ///
    /// The context is exited when the returned guard is dropped.
    pub(crate) fn enter(instance: Rc<Instance>) -> Self {
        let instance_id = instance.id();
        CONTEXT_STACK.with(|stack| stack.borrow_mut().push(instance));
        Self { instance_id }
    }
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        if let Some(popped) = pop() {
            debug_assert_eq!(
                popped.id(),
                self.instance_id,
                "context stack mismatch: expected instance {:?}, got {:?}",
                self.instance_id,
                popped.id()
            );
        }
    }
}

/// The instance currently under construction, if any. No side effects.
pub(crate) fn current() -> Option<Rc<Instance>> {
    CONTEXT_STACK.with(|stack| stack.borrow().last().cloned())
}

/// Remove and return the top of the stack.
///
/// An underflow means a push/pop pairing was violated somewhere in the
/// framework: `Strict` mode fails fast, `Relaxed` mode logs and
/// returns `None`.
pub(crate) fn pop() -> Option<Rc<Instance>> {
    CONTEXT_STACK.with(|stack| {
        let mut stack = stack.borrow_mut();
        if stack.is_empty() {
            match strictness() {
                Strictness::Strict => {
                    panic!("context stack underflow: pop with no component under construction")
                }
                Strictness::Relaxed => {
                    tracing::warn!(
                        target: "trellis",
                        "context stack underflow: pop with no component under construction"
                    );
                    None
                }
            }
        } else {
            stack.pop()
        }
    })
}

/// Current nesting depth, for diagnostics.
#[cfg(test)]
pub(crate) fn depth() -> usize {
    CONTEXT_STACK.with(|stack| stack.borrow().len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instance() -> Rc<Instance> {
        Instance::new("test", None)
    }

    #[test]
    fn guard_tracks_current_instance() {
        assert!(current().is_none());

        let inst = instance();
        {
            let _ctx = ContextGuard::enter(Rc::clone(&inst));
            let top = current().expect("context should be active");
            assert_eq!(top.id(), inst.id());
        }

        // Stack should be restored after drop.
        assert!(current().is_none());
        assert_eq!(depth(), 0);
    }

    #[test]
    fn nested_guards() {
        let outer = instance();
        let inner = instance();

        {
            let _outer_ctx = ContextGuard::enter(Rc::clone(&outer));
            assert_eq!(current().map(|i| i.id()), Some(outer.id()));

            {
                let _inner_ctx = ContextGuard::enter(Rc::clone(&inner));
                assert_eq!(current().map(|i| i.id()), Some(inner.id()));
                assert_eq!(depth(), 2);
            }

            // After the inner guard drops, the outer entry is current.
            assert_eq!(current().map(|i| i.id()), Some(outer.id()));
        }

        assert!(current().is_none());
    }

    // Strict is the default under debug_assertions only.
    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "context stack underflow")]
    fn strict_underflow_fails_fast() {
        let _ = pop();
    }
}
