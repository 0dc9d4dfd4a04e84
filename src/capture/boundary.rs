// SPDX-License-Identifier: MPL-2.0
//! Error boundary for render closures.
//!
//! [`guard`] runs a closure under `catch_unwind`. A panic inside it is
//! reported once, with a component stack as context, and the closure's
//! output is replaced by `None` so the caller can render a fallback.
//!
//! When the global panic hook is installed it sees the panic first. Inside a
//! boundary the hook only stashes the richer hook-side error (location,
//! backtrace) for the boundary to report, so nothing is reported twice.

use std::cell::{Cell, RefCell};
use std::panic::{self, AssertUnwindSafe};

use super::{CapturedError, Reporter};

thread_local! {
    /// Number of boundaries currently on this thread's stack.
    static ACTIVE: Cell<usize> = const { Cell::new(0) };
    static STASHED: RefCell<Option<CapturedError>> = const { RefCell::new(None) };
}

/// Called by the panic hook. Returns `true` if a boundary on this thread will
/// report the panic itself.
pub(crate) fn intercept(error: &CapturedError) -> bool {
    if ACTIVE.get() == 0 {
        return false;
    }
    STASHED.set(Some(error.clone()));
    true
}

/// Runs `render`, reporting any panic through `reporter`.
///
/// `components` names the enclosing components, innermost first; it becomes
/// the report context.
///
/// ```
/// use error_overlay::capture::{boundary, ErrorCapture};
///
/// let capture = ErrorCapture::new();
/// let rendered = boundary::guard(&capture, &["CertificatePanel"], || 42);
/// assert_eq!(rendered, Some(42));
/// ```
pub fn guard<R>(
    reporter: &dyn Reporter,
    components: &[&str],
    render: impl FnOnce() -> R,
) -> Option<R> {
    let depth = ACTIVE.get();
    if depth == 0 {
        STASHED.take();
    }
    ACTIVE.set(depth + 1);
    let result = panic::catch_unwind(AssertUnwindSafe(render));
    ACTIVE.set(depth);

    match result {
        Ok(output) => {
            // A panic caught inside `render` itself leaves its record behind.
            STASHED.take();
            Some(output)
        }
        Err(payload) => {
            let error = STASHED
                .take()
                .unwrap_or_else(|| CapturedError::from_panic_payload(payload.as_ref()));
            let context = component_stack(components);
            reporter.report_error(error, Some(&context));
            None
        }
    }
}

/// `["Inner", "Outer"]` -> `"\n    in Inner\n    in Outer"`.
#[must_use]
pub fn component_stack(components: &[&str]) -> String {
    components
        .iter()
        .map(|component| format!("\n    in {component}"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recording {
        reports: Mutex<Vec<(CapturedError, Option<String>)>>,
    }

    impl Reporter for Recording {
        fn report_error(&self, error: CapturedError, context: Option<&str>) {
            self.reports
                .lock()
                .unwrap()
                .push((error, context.map(str::to_owned)));
        }
    }

    #[test]
    fn component_stack_lists_innermost_first() {
        assert_eq!(
            component_stack(&["TlsBadge", "Header", "App"]),
            "\n    in TlsBadge\n    in Header\n    in App"
        );
        assert_eq!(component_stack(&[]), "");
    }

    #[test]
    fn successful_render_passes_through() {
        let reporter = Recording::default();
        assert_eq!(guard(&reporter, &["App"], || "ok"), Some("ok"));
        assert!(reporter.reports.lock().unwrap().is_empty());
    }

    #[test]
    fn panic_is_reported_with_component_stack() {
        let reporter = Recording::default();
        let rendered: Option<()> = guard(&reporter, &["CertificatePanel", "App"], || {
            panic!("certificate chain incomplete")
        });

        assert!(rendered.is_none());
        let reports = reporter.reports.lock().unwrap();
        assert_eq!(reports.len(), 1);
        let (error, context) = &reports[0];
        assert_eq!(error.message(), "certificate chain incomplete");
        assert_eq!(
            context.as_deref(),
            Some("\n    in CertificatePanel\n    in App")
        );
    }

    #[test]
    fn active_count_is_restored_after_panic() {
        let reporter = Recording::default();
        let _: Option<()> = guard(&reporter, &[], || panic!("boom"));
        assert_eq!(ACTIVE.get(), 0);
        assert!(!intercept(&CapturedError::new("Panic", "outside")));
    }

    #[test]
    fn panic_caught_inside_render_does_not_leak_into_next_report() {
        let reporter = Recording::default();
        let rendered = guard(&reporter, &["Inner"], || {
            // What the panic hook does for a panic that `render` handles itself.
            let _ = panic::catch_unwind(|| {
                intercept(&CapturedError::new("Panic", "ssl handled internally"));
                panic!("ssl handled internally")
            });
            1
        });
        assert_eq!(rendered, Some(1));
        assert!(STASHED.with_borrow(Option::is_none));

        let _: Option<()> = guard(&reporter, &["Other"], || panic!("undefined is not a function"));

        let reports = reporter.reports.lock().unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].0.message(), "undefined is not a function");
        assert_eq!(reports[0].1.as_deref(), Some("\n    in Other"));
    }

    #[test]
    fn outermost_boundary_discards_stale_record() {
        STASHED.set(Some(CapturedError::new("Panic", "tls left over")));
        let reporter = Recording::default();

        let _: Option<()> = guard(&reporter, &["Fresh"], || panic!("index out of bounds"));

        let reports = reporter.reports.lock().unwrap();
        assert_eq!(reports[0].0.message(), "index out of bounds");
    }

    #[test]
    fn nested_boundary_reports_once() {
        let reporter = Recording::default();
        let outer = guard(&reporter, &["Outer"], || {
            guard(&reporter, &["Inner", "Outer"], || -> u8 { panic!("inner") })
        });

        assert_eq!(outer, Some(None));
        assert_eq!(reporter.reports.lock().unwrap().len(), 1);
    }
}
