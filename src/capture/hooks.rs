// SPDX-License-Identifier: MPL-2.0
//! Process-wide capture hooks.
//!
//! - [`install_panic_hook`] routes uncaught panics to an [`ErrorCapture`].
//! - [`reported`] and [`spawn_reported`] route failed background futures to
//!   it, the way an unhandled promise rejection would be.

use std::fmt;
use std::future::Future;
use std::panic::{self, PanicHookInfo};

use tokio::task::JoinHandle;

use super::{boundary, CapturedError, ErrorCapture, ReportSeverity};

/// Signature accepted by [`std::panic::set_hook`].
pub type PanicHook = Box<dyn Fn(&PanicHookInfo<'_>) + Sync + Send + 'static>;

/// Keeps the hook that was active before [`install_panic_hook`].
///
/// Dropping the guard (or calling [`PanicHookGuard::restore`]) reinstates it.
pub struct PanicHookGuard {
    previous: Option<PanicHook>,
}

impl PanicHookGuard {
    /// Reinstates the previous panic hook.
    pub fn restore(self) {
        drop(self);
    }
}

impl Drop for PanicHookGuard {
    fn drop(&mut self) {
        // `set_hook` panics when called from a panicking thread.
        if std::thread::panicking() {
            return;
        }
        if let Some(previous) = self.previous.take() {
            panic::set_hook(previous);
        }
    }
}

impl fmt::Debug for PanicHookGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PanicHookGuard")
            .field("holds_previous", &self.previous.is_some())
            .finish()
    }
}

/// Replaces the panic hook with one that reports to `capture`.
///
/// The previous hook is not chained, so panics no longer print to stderr
/// while the guard lives. Panics inside an error [`boundary`] are left to the
/// boundary, which reports them with its component stack.
#[must_use = "dropping the guard restores the previous hook"]
pub fn install_panic_hook(capture: ErrorCapture) -> PanicHookGuard {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let error = CapturedError::from_panic_info(info);
        if boundary::intercept(&error) {
            return;
        }
        capture.log_error(&error, None, ReportSeverity::Error);
    }));
    PanicHookGuard {
        previous: Some(previous),
    }
}

/// Awaits `future`, reporting its error as a rejection.
///
/// Returns the success value, or `None` once the failure has been reported.
pub async fn reported<F, T, E>(capture: ErrorCapture, future: F) -> Option<T>
where
    F: Future<Output = Result<T, E>>,
    E: fmt::Display,
{
    match future.await {
        Ok(value) => Some(value),
        Err(reason) => {
            capture.report_rejection(&reason);
            None
        }
    }
}

/// Spawns `future` on the current tokio runtime with rejection reporting.
///
/// # Panics
///
/// Panics if called outside a tokio runtime.
pub fn spawn_reported<F, T, E>(capture: ErrorCapture, future: F) -> JoinHandle<Option<T>>
where
    F: Future<Output = Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: fmt::Display + Send + 'static,
{
    tokio::spawn(reported(capture, future))
}
