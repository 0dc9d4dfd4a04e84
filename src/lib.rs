// SPDX-License-Identifier: MPL-2.0
//! `error_overlay` captures runtime errors process-wide and shows the relevant
//! ones to end users in a rate-limited notification overlay.
//!
//! Errors arrive from uncaught panics, failed background futures and explicit
//! reports. Only transport and security failures (TLS, certificates, HTTPS)
//! are kept; they are queued FIFO and displayed one at a time, at most one
//! every three seconds, each for ten seconds. Console output is silenced for
//! the lifetime of the process.
//!
//! Call [`ErrorOverlay::init`] first thing in `main`, then
//! [`ErrorOverlay::start`] once a tokio runtime is available.

pub mod app;
pub mod capture;
pub mod config;
pub mod console;
pub mod domain;
pub mod error;
pub mod init;
pub mod logging;
pub mod presenter;

pub use capture::{log_error, CapturedError, ErrorCapture};
pub use error::{Error, Result};
pub use init::ErrorOverlay;
