// SPDX-License-Identifier: MPL-2.0
//! Simulated portal failures for exercising the overlay.
//!
//! Each action raises an error through one of the capture paths a real
//! application would hit: an explicit report, a render panic inside an error
//! boundary, or a failing background request.

use std::time::Duration;

use crate::capture::{self, boundary, hooks, CapturedError, ErrorCapture, Outcome};
use crate::console::{self, Channel};

/// Demo buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoAction {
    /// A certificate validation failure. Shown.
    TlsFailure,
    /// Five TLS failures at once. Shown one by one, rate limited.
    Burst,
    /// An ordinary bug. Filtered out.
    UnrelatedBug,
    /// A component panicking while rendering, inside an error boundary.
    BoundaryPanic,
    /// A background request failing its handshake.
    FailingRequest,
    /// Third-party style console output. Silenced.
    ConsoleNoise,
}

impl DemoAction {
    pub const ALL: [DemoAction; 6] = [
        DemoAction::TlsFailure,
        DemoAction::Burst,
        DemoAction::UnrelatedBug,
        DemoAction::BoundaryPanic,
        DemoAction::FailingRequest,
        DemoAction::ConsoleNoise,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            DemoAction::TlsFailure => "Certificate failure",
            DemoAction::Burst => "Burst of five TLS errors",
            DemoAction::UnrelatedBug => "Unrelated bug",
            DemoAction::BoundaryPanic => "Panic while rendering",
            DemoAction::FailingRequest => "Failing HTTPS request",
            DemoAction::ConsoleNoise => "Write to console",
        }
    }
}

/// Error returned by the simulated payment backend.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("https request to {0} failed: TLS handshake timed out")]
    Handshake(&'static str),
}

const PAYMENT_ENDPOINT: &str = "payments.example.com";

/// Components enclosing the panicking badge, innermost first.
const BADGE_COMPONENTS: [&str; 3] = ["SecurityBadge", "AccountPage", "App"];

/// Raises `count` certificate errors through the global reporting function.
pub fn raise_tls_failures(count: usize) -> Option<Outcome> {
    (1..=count)
        .map(|n| {
            let error = CapturedError::new(
                "CertificateError",
                format!("SSL certificate verification failed for {PAYMENT_ENDPOINT} (attempt {n})"),
            );
            capture::log_error(&error, None)
        })
        .last()
        .flatten()
}

/// Raises an error that the relevance filter drops.
pub fn raise_unrelated_bug(capture: &ErrorCapture) -> Outcome {
    let error = std::io::Error::other("pricing table: unexpected end of input");
    capture.report(&error, None)
}

/// Renders the security badge inside an error boundary. Returns the fallback
/// text when rendering panicked.
pub fn render_security_badge(capture: &ErrorCapture) -> String {
    boundary::guard(capture, &BADGE_COMPONENTS, || -> String {
        panic!("security context missing for current session")
    })
    .unwrap_or_else(|| "Badge unavailable".to_string())
}

/// Simulated network round trip that always fails.
pub async fn payment_request() -> Result<String, RequestError> {
    tokio::time::sleep(Duration::from_millis(300)).await;
    Err(RequestError::Handshake(PAYMENT_ENDPOINT))
}

/// Issues the payment request with rejection reporting.
pub async fn reported_payment_request(capture: ErrorCapture) -> Option<String> {
    hooks::reported(capture, payment_request()).await
}

/// Writes to a known channel and to a late-registered extension channel.
pub fn console_noise() {
    let console = console::global();
    console.emit(Channel::Log, "analytics: page view recorded");
    console.emit(Channel::Warn, "deprecated API used by widget");
    // Unknown to the facade until now; resolves through the catch-all.
    let _ = console.emit_named("analyticsTrace", "session heartbeat");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_action_has_a_label() {
        for action in DemoAction::ALL {
            assert!(!action.label().is_empty());
        }
    }

    #[test]
    fn unrelated_bug_is_dropped() {
        let capture = ErrorCapture::new();
        assert_eq!(raise_unrelated_bug(&capture), Outcome::Dropped);
        assert_eq!(capture.queued_len(), 0);
    }

    #[test]
    fn badge_panic_is_reported_with_components() {
        let capture = ErrorCapture::new();
        assert_eq!(render_security_badge(&capture), "Badge unavailable");

        let messages = capture.pending_messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("security context missing"));
        assert!(messages[0].ends_with("    in SecurityBadge\n    in AccountPage\n    in App"));
    }

    #[tokio::test(start_paused = true)]
    async fn failing_request_is_reported_as_rejection() {
        let capture = ErrorCapture::new();
        let result = reported_payment_request(capture.clone()).await;

        assert!(result.is_none());
        assert_eq!(
            capture.pending_messages(),
            vec![format!(
                "Error: https request to {PAYMENT_ENDPOINT} failed: TLS handshake timed out"
            )]
        );
    }
}
