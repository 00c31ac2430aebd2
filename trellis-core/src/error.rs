//! Errors, Severity, and Strictness
//!
//! The runtime distinguishes three failure classes:
//!
//! 1. Usage errors — the consumer called a lifecycle or mount function
//!    in a state where it cannot work (no component under
//!    construction, a dead instance, a duplicate list key). These are
//!    returned as [`RuntimeError`] values.
//!
//! 2. Render/hook/subscriber failures — consumer callbacks returning
//!    an error. These are isolated at the call site (see
//!    [`crate::report`]) and never abort siblings.
//!
//! 3. Invariant violations — bugs in the framework or its embedding,
//!    such as a context-stack underflow. How hard these fail depends
//!    on the process-wide [`Strictness`].
//!
//! # Strictness
//!
//! `Strict` fails fast with descriptive context; `Relaxed` degrades
//! recoverable violations to logged warnings. The default follows the
//! build: `Strict` under `debug_assertions`, `Relaxed` otherwise.
//! The setting is process-wide (test harnesses run threads) even
//! though each thread owns its own context stack.

use parking_lot::RwLock;
use thiserror::Error;

use crate::list::Key;

/// Boxed error produced by consumer-supplied callbacks (component
/// functions, hooks, render functions, signal subscribers).
pub type BoxError = Box<dyn std::error::Error>;

/// A usage error or contract violation surfaced by the runtime.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// A function that needs a component under construction was called
    /// with none active.
    #[error("`{0}` called outside of a component body")]
    NoActiveComponent(&'static str),

    /// A destroy hook was registered on an instance that is already
    /// destroyed.
    #[error("cannot register a destroy hook on a destroyed instance")]
    InstanceDestroyed,

    /// Two items produced the same key within a single reconciliation
    /// pass. The pass is rejected wholesale.
    #[error("duplicate list key `{0}` within a single pass")]
    DuplicateKey(Key),
}

/// How severe an error is, independent of the mode the runtime runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The operation cannot proceed in any mode.
    Fatal,
    /// `Relaxed` mode may degrade this to a logged warning plus a
    /// fallback behavior.
    Recoverable,
}

impl RuntimeError {
    /// The severity of this error.
    pub fn severity(&self) -> Severity {
        match self {
            RuntimeError::NoActiveComponent(_) => Severity::Recoverable,
            RuntimeError::InstanceDestroyed => Severity::Fatal,
            RuntimeError::DuplicateKey(_) => Severity::Fatal,
        }
    }
}

/// Failure policy for recoverable invariant violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strictness {
    /// Fail fast with descriptive context.
    Strict,
    /// Log a warning and fall back where a fallback exists.
    Relaxed,
}

const DEFAULT_STRICTNESS: Strictness = if cfg!(debug_assertions) {
    Strictness::Strict
} else {
    Strictness::Relaxed
};

static STRICTNESS: RwLock<Strictness> = RwLock::new(DEFAULT_STRICTNESS);

/// The current process-wide strictness.
pub fn strictness() -> Strictness {
    *STRICTNESS.read()
}

/// Override the process-wide strictness.
pub fn set_strictness(mode: Strictness) {
    *STRICTNESS.write() = mode;
}
