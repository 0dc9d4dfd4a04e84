// SPDX-License-Identifier: MPL-2.0
//! Async drain loop.
//!
//! Exactly one drain loop runs per overlay. It sleeps until the capture kicks
//! it, then mounts queued errors one at a time, waiting for the rate limit
//! between two mounts, until a poll finds the queue empty.
//!
//! The loop uses tokio timers and must be polled inside a tokio runtime.
//! Unmount timers are owned by the loop: dropping or aborting it cancels them.

use tokio::runtime::Handle;
use tokio::task::JoinSet;
use tokio::time::{self, Instant};

use super::{lock, DrainStep, NotificationId, SharedPresenter};
use crate::capture::ErrorCapture;

/// Drives a [`SharedPresenter`] from an [`ErrorCapture`].
#[derive(Debug)]
pub struct DrainLoop {
    capture: ErrorCapture,
    presenter: SharedPresenter,
    timers: JoinSet<()>,
}

impl DrainLoop {
    #[must_use]
    pub fn new(capture: ErrorCapture, presenter: SharedPresenter) -> Self {
        Self {
            capture,
            presenter,
            timers: JoinSet::new(),
        }
    }

    /// Runs forever: wait for a kick, drain, repeat.
    ///
    /// Returns at once, logging an error, when polled outside a tokio
    /// runtime. Errors stay queued in that case.
    pub async fn run(mut self) {
        if Handle::try_current().is_err() {
            tracing::error!(
                "drain loop polled outside a tokio runtime; errors will not be displayed"
            );
            return;
        }
        loop {
            self.capture.kicked().await;
            let shown = self.drain().await;
            tracing::debug!(shown, "drain pass finished");
        }
    }

    /// Mounts queued errors until the queue is empty. Returns how many were shown.
    ///
    /// Each mount starts its own unmount timer, so a dismissal never affects
    /// another notification's lifetime.
    ///
    /// # Panics
    ///
    /// Panics when polled outside a tokio runtime.
    pub async fn drain(&mut self) -> usize {
        let mut shown = 0;
        loop {
            let (step, expires_at) = {
                let mut presenter = lock(&self.presenter);
                let step = presenter.display_next(&self.capture, Instant::now());
                let expires_at = match step {
                    DrainStep::Shown { id, .. } => presenter.expires_at(id),
                    DrainStep::Idle => None,
                };
                (step, expires_at)
            };

            match step {
                DrainStep::Idle => return shown,
                DrainStep::Shown { id, next_drain_at } => {
                    shown += 1;
                    if let Some(deadline) = expires_at {
                        self.schedule_unmount(id, deadline);
                    }
                    time::sleep_until(next_drain_at).await;
                }
            }
        }
    }

    /// Number of unmount timers still running.
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    fn schedule_unmount(&mut self, id: NotificationId, deadline: Instant) {
        // Reap finished timers so the set does not grow with every mount.
        while self.timers.try_join_next().is_some() {}
        let presenter = self.presenter.clone();
        self.timers.spawn(async move {
            time::sleep_until(deadline).await;
            lock(&presenter).unmount(id);
        });
    }
}
