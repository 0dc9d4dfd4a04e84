// SPDX-License-Identifier: MPL-2.0
//! One-shot wiring of the error subsystem.
//!
//! [`ErrorOverlay::init`] must run before any other application code so that
//! nothing escapes capture or prints to the console:
//!
//! 1. create the [`ErrorCapture`] and publish it in the global reporting slot,
//! 2. install the panic hook,
//! 3. create the single overlay ([`SharedPresenter`]),
//! 4. apply the console interceptor (unless disabled in config).
//!
//! The long-running parts (drain loop, console re-assertion) are started
//! separately with [`ErrorOverlay::start`], or handed to a host executor via
//! [`ErrorOverlay::drain_loop`] and [`ErrorOverlay::reassertion`].

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::capture::hooks::{self, PanicHookGuard};
use crate::capture::{self, ErrorCapture};
use crate::config::Config;
use crate::console::{Console, ConsoleInterceptor};
use crate::domain::overlay::ReassertInterval;
use crate::error::{Error, Result};
use crate::logging::LogHandle;
use crate::presenter::{self, DrainLoop, PresenterSettings, SharedPresenter};

static INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Returns `true` while an [`ErrorOverlay`] is alive.
#[must_use]
pub fn is_initialized() -> bool {
    INITIALIZED.load(Ordering::Acquire)
}

/// The process-wide error subsystem.
///
/// Dropping it (or calling [`ErrorOverlay::dispose`]) stops the background
/// tasks it spawned, restores the previous panic hook and empties the global
/// reporting slot. Console silencing is not reverted.
#[derive(Debug)]
pub struct ErrorOverlay {
    capture: ErrorCapture,
    presenter: SharedPresenter,
    interceptor: Option<Arc<ConsoleInterceptor>>,
    reassert_interval: ReassertInterval,
    panic_hook: Option<PanicHookGuard>,
    drain_taken: bool,
    reassertion_taken: bool,
    tasks: Vec<JoinHandle<()>>,
}

impl ErrorOverlay {
    /// Wires the error subsystem.
    ///
    /// `console` is the facade to silence; `log_handle`, when given, is
    /// switched off together with it.
    ///
    /// # Errors
    ///
    /// Returns `Error::AlreadyInitialized` if another instance is alive or a
    /// capture is already installed in the global slot.
    pub fn init(
        config: &Config,
        console: Arc<Console>,
        log_handle: Option<LogHandle>,
    ) -> Result<Self> {
        if INITIALIZED
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(Error::AlreadyInitialized);
        }

        let capture = ErrorCapture::new();
        if !capture::install_global(&capture) {
            INITIALIZED.store(false, Ordering::Release);
            return Err(Error::AlreadyInitialized);
        }
        let panic_hook = hooks::install_panic_hook(capture.clone());
        let presenter = presenter::shared(PresenterSettings::from_config(&config.overlay));

        let interceptor = if config.console.silence() {
            let mut interceptor = ConsoleInterceptor::new(console, config.console.mode());
            if let Some(handle) = log_handle {
                interceptor = interceptor.with_log_handle(handle);
            }
            tracing::info!(mode = ?interceptor.mode(), "silencing console output");
            interceptor.apply();
            Some(Arc::new(interceptor))
        } else {
            tracing::info!("console interception disabled by configuration");
            None
        };

        Ok(Self {
            capture,
            presenter,
            interceptor,
            reassert_interval: config.console.reassert_interval(),
            panic_hook: Some(panic_hook),
            drain_taken: false,
            reassertion_taken: false,
            tasks: Vec::new(),
        })
    }

    #[must_use]
    pub fn capture(&self) -> &ErrorCapture {
        &self.capture
    }

    #[must_use]
    pub fn presenter(&self) -> &SharedPresenter {
        &self.presenter
    }

    #[must_use]
    pub fn interceptor(&self) -> Option<&Arc<ConsoleInterceptor>> {
        self.interceptor.as_ref()
    }

    /// Hands out the drain loop. `None` once it has been taken or started.
    ///
    /// The loop must be polled on a tokio runtime. Elsewhere it logs an error
    /// and returns immediately, leaving errors queued. Its unmount timers live
    /// and die with it.
    pub fn drain_loop(&mut self) -> Option<DrainLoop> {
        if std::mem::replace(&mut self.drain_taken, true) {
            return None;
        }
        Some(DrainLoop::new(self.capture.clone(), self.presenter.clone()))
    }

    /// Hands out the console re-assertion future.
    ///
    /// `None` when interception is disabled or the future was already taken.
    pub fn reassertion(&mut self) -> Option<impl Future<Output = ()> + Send + 'static> {
        let interceptor = self.interceptor.clone()?;
        if std::mem::replace(&mut self.reassertion_taken, true) {
            return None;
        }
        Some(interceptor.run_reassertion(self.reassert_interval))
    }

    /// Spawns the drain loop and the re-assertion task on the current tokio
    /// runtime.
    ///
    /// Returns `false` without a runtime; the subsystem then runs degraded
    /// (errors are queued but never shown).
    pub fn start(&mut self) -> bool {
        let Ok(runtime) = Handle::try_current() else {
            tracing::warn!("no tokio runtime; error overlay will not display");
            return false;
        };
        if let Some(drain) = self.drain_loop() {
            self.tasks.push(runtime.spawn(drain.run()));
        }
        if let Some(reassertion) = self.reassertion() {
            self.tasks.push(runtime.spawn(reassertion));
        }
        true
    }

    /// Tears the subsystem down. Equivalent to dropping it.
    ///
    /// Aborting the drain task started by [`ErrorOverlay::start`] also cancels
    /// its pending unmount timers. A loop taken with
    /// [`ErrorOverlay::drain_loop`] is stopped by its host.
    pub fn dispose(self) {
        drop(self);
    }
}

impl Drop for ErrorOverlay {
    fn drop(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
        if let Some(guard) = self.panic_hook.take() {
            guard.restore();
        }
        capture::clear_global(&self.capture);
        INITIALIZED.store(false, Ordering::Release);
    }
}
