//! Lifecycle Hooks
//!
//! `on_mount` and `on_destroy` register callbacks against whatever
//! instance is currently under construction. Mount hooks run once,
//! right after the component function has produced its surface node;
//! destroy hooks run once, during teardown, before the node is
//! detached.

use crate::error::{BoxError, RuntimeError};
use crate::runtime::context;

/// Register a callback to run after the current component mounts.
///
/// Fails with [`RuntimeError::NoActiveComponent`] outside a component
/// body.
pub fn on_mount<F>(hook: F) -> Result<(), RuntimeError>
where
    F: FnOnce() -> Result<(), BoxError> + 'static,
{
    match context::current() {
        Some(instance) => {
            instance.push_mount_hook(Box::new(hook));
            Ok(())
        }
        None => Err(RuntimeError::NoActiveComponent("on_mount")),
    }
}

/// Register a callback to run when the current component is destroyed.
///
/// Fails with [`RuntimeError::NoActiveComponent`] outside a component
/// body, and with [`RuntimeError::InstanceDestroyed`] if the current
/// instance has already been torn down.
pub fn on_destroy<F>(hook: F) -> Result<(), RuntimeError>
where
    F: FnOnce() -> Result<(), BoxError> + 'static,
{
    match context::current() {
        Some(instance) => {
            if instance.is_destroyed() {
                return Err(RuntimeError::InstanceDestroyed);
            }
            instance.push_destroy_hook(Box::new(hook));
            Ok(())
        }
        None => Err(RuntimeError::NoActiveComponent("on_destroy")),
    }
}
