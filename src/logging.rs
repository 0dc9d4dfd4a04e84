// SPDX-License-Identifier: MPL-2.0
//! `tracing` subscriber setup.
//!
//! The filter sits behind a `reload` layer so the console interceptor can
//! switch all output off at runtime (and keep it off).

use crate::error::{Error, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, reload, EnvFilter, Registry};

/// Directive that disables every level.
const OFF: &str = "off";

type FilterHandle = reload::Handle<EnvFilter, Registry>;

/// Handle to the global subscriber's filter.
#[derive(Clone)]
pub struct LogHandle {
    filter: FilterHandle,
    silenced: Arc<AtomicBool>,
}

impl LogHandle {
    fn new(filter: FilterHandle) -> Self {
        Self {
            filter,
            silenced: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Turns all output off. Cheap when already silenced.
    ///
    /// Returns `false` if the subscriber is gone.
    pub fn silence(&self) -> bool {
        if self.silenced.load(Ordering::Acquire) {
            return true;
        }
        let ok = self.filter.modify(|f| *f = EnvFilter::new(OFF)).is_ok();
        self.silenced.store(ok, Ordering::Release);
        ok
    }

    #[must_use]
    pub fn is_silenced(&self) -> bool {
        self.silenced.load(Ordering::Acquire)
    }

    /// Replaces the filter with a new directive.
    ///
    /// # Errors
    ///
    /// Returns `Error::Logging` if the directive does not parse or the
    /// subscriber has been dropped.
    pub fn set_level(&self, directive: &str) -> Result<()> {
        let filter = EnvFilter::try_new(directive).map_err(|e| Error::Logging(e.to_string()))?;
        self.filter
            .reload(filter)
            .map_err(|e| Error::Logging(e.to_string()))?;
        self.silenced.store(false, Ordering::Release);
        Ok(())
    }
}

impl std::fmt::Debug for LogHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogHandle")
            .field("silenced", &self.is_silenced())
            .finish_non_exhaustive()
    }
}

/// Installs the global subscriber.
///
/// `RUST_LOG` wins over `level` when set.
///
/// # Errors
///
/// Returns `Error::Logging` if the directive is invalid or a global
/// subscriber is already installed.
pub fn init(level: &str) -> Result<LogHandle> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| Error::Logging(e.to_string()))?;
    let (filter_layer, handle) = reload::Layer::new(filter);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt::layer().with_target(false))
        .try_init()
        .map_err(|e| Error::Logging(e.to_string()))?;

    Ok(LogHandle::new(handle))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detached() -> (reload::Layer<EnvFilter, Registry>, LogHandle) {
        let (layer, handle) = reload::Layer::new(EnvFilter::new("info"));
        (layer, LogHandle::new(handle))
    }

    #[test]
    fn silence_switches_filter_off() {
        let (_layer, handle) = detached();
        assert!(!handle.is_silenced());

        assert!(handle.silence());
        assert!(handle.is_silenced());
        let current = handle.filter.with_current(ToString::to_string).unwrap();
        assert_eq!(current, OFF);
    }

    #[test]
    fn set_level_clears_silenced_flag() {
        let (_layer, handle) = detached();
        handle.silence();
        handle.set_level("debug").unwrap();
        assert!(!handle.is_silenced());
    }

    #[test]
    fn silence_fails_once_layer_is_dropped() {
        let (layer, handle) = detached();
        drop(layer);
        assert!(!handle.silence());
        assert!(!handle.is_silenced());
    }

    #[test]
    fn invalid_directive_is_rejected() {
        let (_layer, handle) = detached();
        assert!(matches!(
            handle.set_level("error_overlay=loudest"),
            Err(Error::Logging(_))
        ));
    }
}
