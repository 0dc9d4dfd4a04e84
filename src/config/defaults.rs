// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! This module serves as the single source of truth for default values
//! used across the crate. Constants are organized by category.
//!
//! # Categories
//!
//! - **Overlay**: Rate limit between notifications, display duration, narrow layout
//! - **Console**: Re-assertion interval of the console interceptor
//! - **Logging**: Default `tracing` filter directive

// ==========================================================================
// Overlay Defaults
// ==========================================================================

/// Minimum spacing between two notifications appearing (in milliseconds).
pub const DEFAULT_RATE_LIMIT_MS: u64 = 3_000;

/// Lower bound for the configurable rate limit.
pub const MIN_RATE_LIMIT_MS: u64 = 250;

/// Upper bound for the configurable rate limit.
pub const MAX_RATE_LIMIT_MS: u64 = 60_000;

/// How long a notification stays mounted before it is removed (in milliseconds).
pub const DEFAULT_DISPLAY_DURATION_MS: u64 = 10_000;

/// Lower bound for the configurable display duration.
pub const MIN_DISPLAY_DURATION_MS: u64 = 1_000;

/// Upper bound for the configurable display duration.
pub const MAX_DISPLAY_DURATION_MS: u64 = 120_000;

/// Viewport width (logical pixels) below which the overlay goes full-width.
pub const DEFAULT_NARROW_VIEWPORT_WIDTH: f32 = 768.0;

/// Width of a toast when anchored to the corner.
pub const TOAST_WIDTH: f32 = 360.0;

// ==========================================================================
// Console Defaults
// ==========================================================================

/// Period of the console re-assertion task (in milliseconds).
pub const DEFAULT_REASSERT_INTERVAL_MS: u64 = 1_000;

/// Lower bound for the re-assertion period.
pub const MIN_REASSERT_INTERVAL_MS: u64 = 100;

/// Upper bound for the re-assertion period.
pub const MAX_REASSERT_INTERVAL_MS: u64 = 60_000;

// ==========================================================================
// Logging Defaults
// ==========================================================================

/// Filter directive used when neither the config nor `RUST_LOG` sets one.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// ==========================================================================
// Compile-time Validation
// ==========================================================================

const _: () = {
    assert!(MIN_RATE_LIMIT_MS > 0);
    assert!(MAX_RATE_LIMIT_MS >= MIN_RATE_LIMIT_MS);
    assert!(DEFAULT_RATE_LIMIT_MS >= MIN_RATE_LIMIT_MS);
    assert!(DEFAULT_RATE_LIMIT_MS <= MAX_RATE_LIMIT_MS);

    assert!(MIN_DISPLAY_DURATION_MS > 0);
    assert!(MAX_DISPLAY_DURATION_MS >= MIN_DISPLAY_DURATION_MS);
    assert!(DEFAULT_DISPLAY_DURATION_MS >= MIN_DISPLAY_DURATION_MS);
    assert!(DEFAULT_DISPLAY_DURATION_MS <= MAX_DISPLAY_DURATION_MS);

    // Several notifications are expected to be visible at once.
    assert!(DEFAULT_DISPLAY_DURATION_MS > DEFAULT_RATE_LIMIT_MS);

    assert!(MIN_REASSERT_INTERVAL_MS > 0);
    assert!(MAX_REASSERT_INTERVAL_MS >= MIN_REASSERT_INTERVAL_MS);
    assert!(DEFAULT_REASSERT_INTERVAL_MS >= MIN_REASSERT_INTERVAL_MS);
    assert!(DEFAULT_REASSERT_INTERVAL_MS <= MAX_REASSERT_INTERVAL_MS);
};
