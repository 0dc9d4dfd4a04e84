// SPDX-License-Identifier: MPL-2.0
//! Overlay timing newtypes.
//!
//! These wrappers keep every timing value inside its valid range, so a
//! hand-edited `settings.toml` cannot ask for a zero rate limit or a
//! notification that never goes away.

use std::time::Duration;

// =============================================================================
// Bounds
// =============================================================================

/// Rate limit bounds (250 ms to 60 s).
pub mod rate_limit_bounds {
    /// Minimum spacing in milliseconds.
    pub const MIN: u64 = 250;
    /// Maximum spacing in milliseconds.
    pub const MAX: u64 = 60_000;
    /// Default spacing in milliseconds.
    pub const DEFAULT: u64 = 3_000;
}

/// Display duration bounds (1 s to 120 s).
pub mod display_duration_bounds {
    /// Minimum duration in milliseconds.
    pub const MIN: u64 = 1_000;
    /// Maximum duration in milliseconds.
    pub const MAX: u64 = 120_000;
    /// Default duration in milliseconds.
    pub const DEFAULT: u64 = 10_000;
}

/// Console re-assertion interval bounds (100 ms to 60 s).
pub mod reassert_interval_bounds {
    /// Minimum interval in milliseconds.
    pub const MIN: u64 = 100;
    /// Maximum interval in milliseconds.
    pub const MAX: u64 = 60_000;
    /// Default interval in milliseconds.
    pub const DEFAULT: u64 = 1_000;
}

// =============================================================================
// RateLimit
// =============================================================================

/// Minimum time between two consecutive notifications being mounted.
///
/// This bounds how often a new error may *appear*, not how long each one
/// stays on screen.
///
/// # Example
///
/// ```
/// use error_overlay::domain::overlay::RateLimit;
///
/// assert_eq!(RateLimit::default().millis(), 3_000);
/// assert_eq!(RateLimit::from_millis(10).millis(), 250); // clamped
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RateLimit(u64);

impl RateLimit {
    /// Creates a rate limit, clamping to the valid range.
    #[must_use]
    pub fn from_millis(value: u64) -> Self {
        Self(value.clamp(rate_limit_bounds::MIN, rate_limit_bounds::MAX))
    }

    /// Returns the value in milliseconds.
    #[must_use]
    pub fn millis(self) -> u64 {
        self.0
    }

    /// Returns the value as a [`Duration`].
    #[must_use]
    pub fn as_duration(self) -> Duration {
        Duration::from_millis(self.0)
    }
}

impl Default for RateLimit {
    fn default() -> Self {
        Self(rate_limit_bounds::DEFAULT)
    }
}

// =============================================================================
// DisplayDuration
// =============================================================================

/// How long a mounted notification stays visible absent manual dismissal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct DisplayDuration(u64);

impl DisplayDuration {
    /// Creates a display duration, clamping to the valid range.
    #[must_use]
    pub fn from_millis(value: u64) -> Self {
        Self(value.clamp(display_duration_bounds::MIN, display_duration_bounds::MAX))
    }

    /// Returns the value in milliseconds.
    #[must_use]
    pub fn millis(self) -> u64 {
        self.0
    }

    /// Returns the value as a [`Duration`].
    #[must_use]
    pub fn as_duration(self) -> Duration {
        Duration::from_millis(self.0)
    }
}

impl Default for DisplayDuration {
    fn default() -> Self {
        Self(display_duration_bounds::DEFAULT)
    }
}

// =============================================================================
// ReassertInterval
// =============================================================================

/// Period at which the console interceptor re-applies itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReassertInterval(u64);

impl ReassertInterval {
    /// Creates an interval, clamping to the valid range.
    #[must_use]
    pub fn from_millis(value: u64) -> Self {
        Self(value.clamp(
            reassert_interval_bounds::MIN,
            reassert_interval_bounds::MAX,
        ))
    }

    /// Returns the value in milliseconds.
    #[must_use]
    pub fn millis(self) -> u64 {
        self.0
    }

    /// Returns the value as a [`Duration`].
    #[must_use]
    pub fn as_duration(self) -> Duration {
        Duration::from_millis(self.0)
    }
}

impl Default for ReassertInterval {
    fn default() -> Self {
        Self(reassert_interval_bounds::DEFAULT)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limit_clamps() {
        assert_eq!(RateLimit::from_millis(0).millis(), rate_limit_bounds::MIN);
        assert_eq!(
            RateLimit::from_millis(u64::MAX).millis(),
            rate_limit_bounds::MAX
        );
        assert_eq!(RateLimit::from_millis(1_500).millis(), 1_500);
    }

    #[test]
    fn display_duration_clamps() {
        assert_eq!(
            DisplayDuration::from_millis(5).millis(),
            display_duration_bounds::MIN
        );
        assert_eq!(
            DisplayDuration::from_millis(1_000_000).millis(),
            display_duration_bounds::MAX
        );
    }

    #[test]
    fn reassert_interval_clamps() {
        assert_eq!(
            ReassertInterval::from_millis(1).millis(),
            reassert_interval_bounds::MIN
        );
        assert_eq!(ReassertInterval::from_millis(2_000).millis(), 2_000);
    }

    #[test]
    fn defaults_match_bounds() {
        assert_eq!(RateLimit::default().millis(), rate_limit_bounds::DEFAULT);
        assert_eq!(
            DisplayDuration::default().millis(),
            display_duration_bounds::DEFAULT
        );
        assert_eq!(
            ReassertInterval::default().millis(),
            reassert_interval_bounds::DEFAULT
        );
    }

    #[test]
    fn durations_convert() {
        assert_eq!(
            RateLimit::default().as_duration(),
            Duration::from_millis(3_000)
        );
        assert_eq!(
            DisplayDuration::default().as_duration(),
            Duration::from_secs(10)
        );
    }
}
