// SPDX-License-Identifier: MPL-2.0
//! Central collection point for runtime errors.
//!
//! An [`ErrorCapture`] receives errors from three sources:
//!
//! - uncaught panics, through the hook installed by [`hooks::install_panic_hook`],
//! - failed background futures ("unhandled rejections"), through
//!   [`hooks::reported`] / [`hooks::spawn_reported`],
//! - explicit reports, e.g. from an error [`boundary`] around a render closure.
//!
//! Each report is formatted, passed through the [`RelevanceFilter`], and, if
//! it qualifies, appended to a FIFO [`ErrorQueue`] that the presenter drains.
//! The capture never writes to the console or to `tracing`; its only effects
//! are queue mutation and waking the drain loop.
//!
//! # Usage
//!
//! ```
//! use error_overlay::capture::{CapturedError, ErrorCapture, Outcome, ReportSeverity};
//!
//! let capture = ErrorCapture::new();
//! let error = CapturedError::new("Error", "SSL certificate verification failed");
//!
//! let outcome = capture.log_error(&error, None, ReportSeverity::Error);
//! assert_eq!(outcome, Outcome::Enqueued { kicked: true });
//! assert_eq!(capture.queued_len(), 1);
//! ```

pub mod boundary;
mod filter;
pub mod hooks;
mod queue;
mod report;

pub use filter::{RelevanceFilter, DEFAULT_KEYWORDS};
pub use queue::{ErrorQueue, QueuedError};
pub use report::{CapturedError, ReportSeverity, PANIC_NAME, REJECTION_NAME};

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use tokio::sync::Notify;

/// What happened to a single report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Rejected by the relevance filter.
    Dropped,
    /// Relevant, but a warning; warnings are never displayed.
    Suppressed,
    /// Appended to the queue. `kicked` is true when the drain loop was idle
    /// and has been woken.
    Enqueued { kicked: bool },
}

/// Narrow reporting interface handed to collaborators.
pub trait Reporter: Send + Sync {
    fn report_error(&self, error: CapturedError, context: Option<&str>);
}

#[derive(Debug, Default)]
struct CaptureState {
    queue: ErrorQueue,
    /// Set while a drain is in progress or pending.
    displaying: bool,
}

struct Inner {
    state: Mutex<CaptureState>,
    filter: RelevanceFilter,
    kick: Notify,
}

/// Owns the display queue and the drain flag. Cheap to clone.
#[derive(Clone)]
pub struct ErrorCapture {
    inner: Arc<Inner>,
}

impl ErrorCapture {
    /// Creates a capture with the default transport/security filter.
    #[must_use]
    pub fn new() -> Self {
        Self::with_filter(RelevanceFilter::new())
    }

    #[must_use]
    pub fn with_filter(filter: RelevanceFilter) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(CaptureState::default()),
                filter,
                kick: Notify::new(),
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, CaptureState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Formats, filters and possibly enqueues an error.
    ///
    /// When the error is enqueued and no drain is in progress, the
    /// displaying flag is set and the drain loop is woken. The flag is
    /// checked and set under the queue lock, so at most one drain runs.
    pub fn log_error(
        &self,
        error: &CapturedError,
        context: Option<&str>,
        severity: ReportSeverity,
    ) -> Outcome {
        let message = error.format(context);
        if !self.inner.filter.is_relevant(&message) {
            return Outcome::Dropped;
        }
        if severity == ReportSeverity::Warning {
            return Outcome::Suppressed;
        }

        let kicked = {
            let mut state = self.state();
            state.queue.push(QueuedError::new(message));
            !std::mem::replace(&mut state.displaying, true)
        };
        if kicked {
            self.inner.kick.notify_one();
        }
        Outcome::Enqueued { kicked }
    }

    /// Reports any error value at error severity.
    pub fn report<E>(&self, error: &E, context: Option<&str>) -> Outcome
    where
        E: std::error::Error + 'static,
    {
        self.log_error(
            &CapturedError::from_error(error),
            context,
            ReportSeverity::Error,
        )
    }

    /// Reports the reason a background future failed.
    pub fn report_rejection(&self, reason: &dyn fmt::Display) -> Outcome {
        self.log_error(
            &CapturedError::from_rejection(reason),
            None,
            ReportSeverity::Error,
        )
    }

    /// Pops the oldest queued error for display.
    ///
    /// Returns `None` and clears the displaying flag when the queue is empty.
    pub fn take_next(&self) -> Option<QueuedError> {
        let mut state = self.state();
        let next = state.queue.pop();
        state.displaying = next.is_some();
        next
    }

    /// Waits until an enqueue wakes an idle drain loop.
    ///
    /// A wake-up that happens while nobody waits is kept for the next call.
    pub async fn kicked(&self) {
        self.inner.kick.notified().await;
    }

    #[must_use]
    pub fn is_displaying(&self) -> bool {
        self.state().displaying
    }

    #[must_use]
    pub fn queued_len(&self) -> usize {
        self.state().queue.len()
    }

    /// Messages currently waiting, oldest first.
    #[must_use]
    pub fn pending_messages(&self) -> Vec<String> {
        self.state()
            .queue
            .iter()
            .map(|queued| queued.message.clone())
            .collect()
    }

    #[must_use]
    pub fn filter(&self) -> &RelevanceFilter {
        &self.inner.filter
    }

    /// Whether two handles share the same queue.
    #[must_use]
    pub fn same_as(&self, other: &ErrorCapture) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Default for ErrorCapture {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ErrorCapture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state();
        f.debug_struct("ErrorCapture")
            .field("queued", &state.queue.len())
            .field("displaying", &state.displaying)
            .finish_non_exhaustive()
    }
}

impl Reporter for ErrorCapture {
    fn report_error(&self, error: CapturedError, context: Option<&str>) {
        self.log_error(&error, context, ReportSeverity::Error);
    }
}

// =============================================================================
// Global reporting slot
// =============================================================================

static GLOBAL: RwLock<Option<ErrorCapture>> = RwLock::new(None);

/// Makes `capture` reachable through [`log_error`].
///
/// Returns `false` (and leaves the slot untouched) if another capture is
/// already installed.
pub fn install_global(capture: &ErrorCapture) -> bool {
    let mut slot = GLOBAL.write().unwrap_or_else(PoisonError::into_inner);
    if slot.is_some() {
        return false;
    }
    *slot = Some(capture.clone());
    true
}

/// Empties the global slot if it holds `capture`.
pub fn clear_global(capture: &ErrorCapture) {
    let mut slot = GLOBAL.write().unwrap_or_else(PoisonError::into_inner);
    if slot.as_ref().is_some_and(|current| current.same_as(capture)) {
        *slot = None;
    }
}

/// Returns the installed capture, if any.
#[must_use]
pub fn global() -> Option<ErrorCapture> {
    GLOBAL
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Reports an error to the installed capture. Does nothing before init.
pub fn log_error(error: &CapturedError, context: Option<&str>) -> Option<Outcome> {
    global().map(|capture| capture.log_error(error, context, ReportSeverity::Error))
}
