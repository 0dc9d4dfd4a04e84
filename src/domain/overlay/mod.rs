// SPDX-License-Identifier: MPL-2.0
//! Overlay timing domain types.
//!
//! This module provides pure value objects for the error overlay:
//! - [`RateLimit`]: Minimum spacing between two notifications appearing
//! - [`DisplayDuration`]: How long a notification stays mounted
//! - [`ReassertInterval`]: Period of the console re-assertion task

mod newtypes;

pub use newtypes::{
    display_duration_bounds, rate_limit_bounds, reassert_interval_bounds, DisplayDuration,
    RateLimit, ReassertInterval,
};
