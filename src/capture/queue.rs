// SPDX-License-Identifier: MPL-2.0
//! FIFO queue of errors waiting to be displayed.
//!
//! Unlike a diagnostics ring buffer, nothing is ever evicted or deduplicated:
//! every qualifying error is shown exactly once, oldest first.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use tokio::time::Instant;

/// An error accepted by the relevance filter, waiting for the presenter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedError {
    /// Formatted, human-readable text.
    pub message: String,
    /// When the error was captured (monotonic clock, diagnostics only).
    pub enqueued_at: Instant,
    /// When the error was captured (wall clock, shown to the user).
    pub captured_at: DateTime<Utc>,
}

impl QueuedError {
    /// Creates a queued error stamped with the current time.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            enqueued_at: Instant::now(),
            captured_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ErrorQueue {
    entries: VecDeque<QueuedError>,
}

impl ErrorQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an error at the tail.
    pub fn push(&mut self, error: QueuedError) {
        self.entries.push_back(error);
    }

    /// Removes and returns the oldest error.
    pub fn pop(&mut self) -> Option<QueuedError> {
        self.entries.pop_front()
    }

    /// Iterates oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &QueuedError> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
