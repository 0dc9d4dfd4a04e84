// SPDX-License-Identifier: MPL-2.0
//! Captured error representation and message formatting.

use std::any::Any;
use std::backtrace::{Backtrace, BacktraceStatus};
use std::fmt;
use std::panic::PanicHookInfo;

/// Name given to errors raised by a panic.
pub const PANIC_NAME: &str = "Panic";

/// Name given to rejection reasons that are not error values.
pub const REJECTION_NAME: &str = "Error";

/// How serious a report is. Only [`ReportSeverity::Error`] reaches the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportSeverity {
    #[default]
    Error,
    Warning,
}

/// An error observed somewhere in the process, reduced to displayable text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedError {
    name: String,
    message: String,
    stack: Option<String>,
}

impl CapturedError {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            stack: None,
        }
    }

    /// Attaches a stack trace or location description.
    #[must_use]
    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        let stack = stack.into();
        self.stack = (!stack.trim().is_empty()).then_some(stack);
        self
    }

    /// Captures any error value. The name is the short type name of `E`.
    ///
    /// ```
    /// use error_overlay::capture::CapturedError;
    ///
    /// let io = std::io::Error::other("certificate expired");
    /// let captured = CapturedError::from_error(&io);
    /// assert_eq!(captured.name(), "Error");
    /// assert_eq!(captured.message(), "certificate expired");
    /// ```
    pub fn from_error<E>(error: &E) -> Self
    where
        E: std::error::Error + 'static,
    {
        Self::from_dyn(short_type_name(std::any::type_name::<E>()), error)
    }

    /// Captures a type-erased error. The `source()` chain is folded into the message.
    pub fn from_dyn(name: impl Into<String>, error: &(dyn std::error::Error + 'static)) -> Self {
        let mut message = error.to_string();
        let mut source = error.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        Self::new(name, message)
    }

    /// Captures a panic payload, as returned by `catch_unwind`.
    pub fn from_panic_payload(payload: &(dyn Any + Send)) -> Self {
        Self::new(PANIC_NAME, payload_message(payload))
    }

    /// Captures a panic from inside a panic hook, with location and backtrace.
    pub fn from_panic_info(info: &PanicHookInfo<'_>) -> Self {
        let mut stack = info
            .location()
            .map(|location| format!("    at {location}"))
            .unwrap_or_default();
        if let Some(backtrace) = captured_backtrace() {
            if !stack.is_empty() {
                stack.push('\n');
            }
            stack.push_str(&backtrace);
        }
        Self::new(PANIC_NAME, payload_message(info.payload())).with_stack(stack)
    }

    /// Wraps a rejection reason that is not necessarily an error value.
    pub fn from_rejection(reason: &dyn fmt::Display) -> Self {
        Self::new(REJECTION_NAME, reason.to_string())
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn stack(&self) -> Option<&str> {
        self.stack.as_deref()
    }

    /// Formats the error for display: `name: message`, then the stack, then
    /// the component-stack context, one block per line.
    #[must_use]
    pub fn format(&self, context: Option<&str>) -> String {
        let mut out = format!("{}: {}", self.name, self.message);
        if let Some(stack) = &self.stack {
            out.push('\n');
            out.push_str(stack.trim_end());
        }
        if let Some(context) = context.map(|c| c.trim_matches('\n')).filter(|c| !c.trim().is_empty()) {
            out.push('\n');
            out.push_str(context);
        }
        out
    }
}

impl fmt::Display for CapturedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.message)
    }
}

fn payload_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "Box<dyn Any>".to_string()
    }
}

/// Returns a formatted backtrace when backtraces are enabled (`RUST_BACKTRACE`).
fn captured_backtrace() -> Option<String> {
    let backtrace = Backtrace::capture();
    (backtrace.status() == BacktraceStatus::Captured).then(|| backtrace.to_string())
}

/// `hyper::error::Error` -> `Error`, `Foo<Bar>` -> `Foo`.
fn short_type_name(full: &str) -> &str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
