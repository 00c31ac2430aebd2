//! Run-and-Report
//!
//! Hook execution, subscriber notification, and teardown all share the
//! same failure policy: a failing callback is reported to the
//! diagnostic sink and its siblings keep running. Centralizing the
//! policy here keeps it defined once.

use crate::error::BoxError;

/// Invoke `f`; on failure, report through the sink and continue.
pub(crate) fn run_reported<F>(label: &str, f: F)
where
    F: FnOnce() -> Result<(), BoxError>,
{
    if let Err(error) = f() {
        tracing::error!(target: "trellis", cause = %error, "{} failed", label);
    }
}
