// SPDX-License-Identifier: MPL-2.0
//! A mounted error notification.

use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::time::Instant;

use crate::capture::QueuedError;
use crate::domain::overlay::DisplayDuration;

/// Unique identifier for a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NotificationId(u64);

impl NotificationId {
    /// Creates a new unique notification ID.
    pub fn new() -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

impl Default for NotificationId {
    fn default() -> Self {
        Self::new()
    }
}

/// One error currently shown in the overlay.
///
/// Lifecycle is `Mounted -> Unmounted`; there is no intermediate state. The
/// notification leaves the overlay when its display duration elapses or when
/// the user dismisses it, whichever comes first.
#[derive(Debug, Clone)]
pub struct Notification {
    id: NotificationId,
    message: String,
    captured_at: DateTime<Utc>,
    mounted_at: Instant,
    expires_at: Instant,
}

impl Notification {
    /// Mounts a queued error at `now`.
    pub fn mount(error: QueuedError, now: Instant, display: DisplayDuration) -> Self {
        Self {
            id: NotificationId::new(),
            message: error.message,
            captured_at: error.captured_at,
            mounted_at: now,
            expires_at: now + display.as_duration(),
        }
    }

    #[must_use]
    pub fn id(&self) -> NotificationId {
        self.id
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    #[must_use]
    pub fn mounted_at(&self) -> Instant {
        self.mounted_at
    }

    #[must_use]
    pub fn expires_at(&self) -> Instant {
        self.expires_at
    }

    /// Returns `true` once the display duration has fully elapsed.
    #[must_use]
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }

    /// Time left before auto-dismiss; zero once expired.
    #[must_use]
    pub fn remaining(&self, now: Instant) -> Duration {
        self.expires_at.saturating_duration_since(now)
    }

    /// Capture time as shown in the toast footer.
    #[must_use]
    pub fn captured_label(&self) -> String {
        self.captured_at.format("%H:%M:%S UTC").to_string()
    }
}
