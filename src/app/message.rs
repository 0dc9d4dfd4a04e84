// SPDX-License-Identifier: MPL-2.0
//! Top-level messages and runtime flags for the demo application.

use crate::config::Config;
use crate::logging::LogHandle;
use crate::presenter::overlay::OverlayMessage;
use std::time::Instant;

use super::demo::DemoAction;

/// Top-level messages consumed by `App::update`.
#[derive(Debug, Clone)]
pub enum Message {
    Overlay(OverlayMessage),
    Demo(DemoAction),
    /// Periodic tick: expire notifications and refresh the overlay snapshot.
    Tick(Instant),
    WindowResized(iced::Size),
    /// A simulated background request completed (`None` when it failed).
    RequestFinished(Option<String>),
    /// A long-running background future returned. Normally never happens.
    BackgroundStopped(&'static str),
}

/// Runtime flags passed in from `main.rs`.
#[derive(Debug, Default)]
pub struct Flags {
    pub config: Config,
    /// Handle to the global subscriber, silenced together with the console.
    pub log_handle: Option<LogHandle>,
}
