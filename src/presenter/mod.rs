// SPDX-License-Identifier: MPL-2.0
//! Rate-limited, serialized error presentation.
//!
//! The [`Presenter`] is a plain state machine over explicit instants: it
//! mounts queued errors, keeps track of their expiry, and decides where the
//! overlay is anchored. Time only enters through the [`DrainLoop`], which
//! paces mounts by the rate limit and runs one unmount timer per
//! notification, and through the host UI tick calling
//! [`Presenter::unmount_expired`].

mod drain;
mod layout;
mod notification;
pub mod overlay;
mod style;

pub use drain::DrainLoop;
pub use layout::Anchor;
pub use notification::{Notification, NotificationId};

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::time::Instant;

use crate::capture::{ErrorCapture, QueuedError};
use crate::config::OverlayConfig;
use crate::domain::overlay::{DisplayDuration, RateLimit};

/// Timing and layout parameters of the presenter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PresenterSettings {
    pub rate_limit: RateLimit,
    pub display_duration: DisplayDuration,
    pub narrow_viewport_width: f32,
}

impl PresenterSettings {
    #[must_use]
    pub fn from_config(config: &OverlayConfig) -> Self {
        Self {
            rate_limit: config.rate_limit(),
            display_duration: config.display_duration(),
            narrow_viewport_width: config.narrow_viewport_width(),
        }
    }
}

impl Default for PresenterSettings {
    fn default() -> Self {
        Self::from_config(&OverlayConfig::default())
    }
}

/// Result of one drain step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainStep {
    /// The queue was empty; the displaying flag has been cleared.
    Idle,
    /// A notification was mounted. The next one may appear at `next_drain_at`.
    Shown {
        id: NotificationId,
        next_drain_at: Instant,
    },
}

/// Copy of what the overlay should render.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub anchor: Anchor,
    /// Visible notifications in mount order.
    pub notifications: Vec<Notification>,
}

/// Overlay state: the anchor and the mounted notifications.
#[derive(Debug)]
pub struct Presenter {
    settings: PresenterSettings,
    anchor: Anchor,
    /// Mount order, oldest first.
    visible: Vec<Notification>,
}

/// The single overlay instance, shared between the drain loop and the UI.
pub type SharedPresenter = Arc<Mutex<Presenter>>;

/// Creates the shared overlay instance.
#[must_use]
pub fn shared(settings: PresenterSettings) -> SharedPresenter {
    Arc::new(Mutex::new(Presenter::new(settings)))
}

/// Locks a shared presenter, recovering from poisoning.
pub fn lock(presenter: &SharedPresenter) -> MutexGuard<'_, Presenter> {
    presenter.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Presenter {
    #[must_use]
    pub fn new(settings: PresenterSettings) -> Self {
        Self {
            settings,
            anchor: Anchor::default(),
            visible: Vec::new(),
        }
    }

    #[must_use]
    pub fn settings(&self) -> &PresenterSettings {
        &self.settings
    }

    #[must_use]
    pub fn anchor(&self) -> Anchor {
        self.anchor
    }

    /// Re-anchors the overlay for a new viewport width.
    pub fn resize(&mut self, width: f32) -> Anchor {
        self.anchor = Anchor::for_width(width, self.settings.narrow_viewport_width);
        self.anchor
    }

    /// Takes the next queued error from `capture` and mounts it.
    ///
    /// When the queue is empty the capture clears its displaying flag and the
    /// step is [`DrainStep::Idle`].
    pub fn display_next(&mut self, capture: &ErrorCapture, now: Instant) -> DrainStep {
        match capture.take_next() {
            Some(error) => {
                let id = self.mount(error, now);
                DrainStep::Shown {
                    id,
                    next_drain_at: now + self.settings.rate_limit.as_duration(),
                }
            }
            None => DrainStep::Idle,
        }
    }

    /// Mounts a notification for `error` at `now`.
    pub fn mount(&mut self, error: QueuedError, now: Instant) -> NotificationId {
        let notification = Notification::mount(error, now, self.settings.display_duration);
        let id = notification.id();
        tracing::debug!(id = id.value(), "mounting error notification");
        self.visible.push(notification);
        id
    }

    /// Removes a notification. Returns `false` if it was already gone.
    pub fn unmount(&mut self, id: NotificationId) -> bool {
        let Some(pos) = self.visible.iter().position(|n| n.id() == id) else {
            return false;
        };
        self.visible.remove(pos);
        true
    }

    /// User-initiated removal through the close button.
    pub fn dismiss(&mut self, id: NotificationId) -> bool {
        let removed = self.unmount(id);
        if removed {
            tracing::debug!(id = id.value(), "notification dismissed");
        }
        removed
    }

    /// Removes every notification whose display duration has elapsed.
    ///
    /// Returns the number removed.
    pub fn unmount_expired(&mut self, now: Instant) -> usize {
        let before = self.visible.len();
        self.visible.retain(|n| !n.is_expired(now));
        before - self.visible.len()
    }

    /// Expiry of a mounted notification.
    #[must_use]
    pub fn expires_at(&self, id: NotificationId) -> Option<Instant> {
        self.visible
            .iter()
            .find(|n| n.id() == id)
            .map(Notification::expires_at)
    }

    /// Visible notifications in mount order.
    pub fn visible(&self) -> impl Iterator<Item = &Notification> {
        self.visible.iter()
    }

    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            anchor: self.anchor,
            notifications: self.visible.clone(),
        }
    }

    /// Drops every mounted notification.
    pub fn clear(&mut self) {
        self.visible.clear();
    }
}
