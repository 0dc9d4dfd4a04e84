// SPDX-License-Identifier: MPL-2.0
//! Console interception.
//!
//! The interceptor silences every channel of a [`Console`] and, when a
//! [`LogHandle`] is attached, switches the `tracing` filter off as well.
//! Third-party code may rebind channels after startup, so the interceptor is
//! re-applied periodically for the lifetime of the process (see
//! [`ConsoleInterceptor::run_reassertion`]).

use super::{Binding, Console};
use crate::domain::overlay::ReassertInterval;
use crate::logging::LogHandle;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::time::{interval, MissedTickBehavior};

/// How unknown channel names are silenced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InterceptMode {
    /// Install a no-op resolver so any channel name, including ones
    /// registered later, resolves to a no-op.
    #[default]
    Proxy,
    /// Only rewrite the channels that exist at the time of application.
    Direct,
}

/// The strategy an [`ConsoleInterceptor::apply`] call actually used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Proxy,
    /// Proxy mode was requested but the console has no dynamic resolution.
    DirectFallback,
    Direct,
}

/// Outcome of one application of the interceptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterceptReport {
    pub strategy: Strategy,
    /// Bindings found emitting and rewritten to no-ops.
    pub rewritten: usize,
}

#[derive(Debug)]
pub struct ConsoleInterceptor {
    console: Arc<Console>,
    mode: InterceptMode,
    log_handle: Option<LogHandle>,
}

impl ConsoleInterceptor {
    #[must_use]
    pub fn new(console: Arc<Console>, mode: InterceptMode) -> Self {
        Self {
            console,
            mode,
            log_handle: None,
        }
    }

    /// Also silences the `tracing` subscriber behind `handle` on each application.
    #[must_use]
    pub fn with_log_handle(mut self, handle: LogHandle) -> Self {
        self.log_handle = Some(handle);
        self
    }

    #[must_use]
    pub fn console(&self) -> &Arc<Console> {
        &self.console
    }

    #[must_use]
    pub fn mode(&self) -> InterceptMode {
        self.mode
    }

    /// Silences the console. Never fails; repeated calls are idempotent.
    pub fn apply(&self) -> InterceptReport {
        let mut rewritten = self.console.silence_bindings();

        let strategy = match self.mode {
            InterceptMode::Direct => Strategy::Direct,
            InterceptMode::Proxy if self.console.resolver_is_noop() => Strategy::Proxy,
            InterceptMode::Proxy => match self.console.install_resolver(Binding::Noop) {
                Ok(()) => {
                    rewritten += 1;
                    Strategy::Proxy
                }
                Err(_) => Strategy::DirectFallback,
            },
        };

        if let Some(handle) = &self.log_handle {
            handle.silence();
        }

        InterceptReport {
            strategy,
            rewritten,
        }
    }

    /// Whether every known and extension channel is currently a no-op.
    #[must_use]
    pub fn is_applied(&self) -> bool {
        self.console.is_silent()
    }

    /// Re-applies the interceptor every `period`, forever.
    ///
    /// The first application happens one period after the call; callers
    /// are expected to have applied once already.
    pub async fn run_reassertion(self: Arc<Self>, period: ReassertInterval) {
        let mut ticker = interval(period.as_duration());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            self.apply();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::Channel;
    use std::sync::Mutex;
    use std::time::Duration;

    #[test]
    fn apply_silences_every_known_channel() {
        let interceptor = ConsoleInterceptor::new(Arc::new(Console::new()), InterceptMode::Proxy);
        let report = interceptor.apply();

        assert_eq!(report.strategy, Strategy::Proxy);
        assert_eq!(report.rewritten, Channel::ALL.len() + 1);
        assert!(interceptor.is_applied());
    }

    #[test]
    fn apply_is_idempotent() {
        let interceptor = ConsoleInterceptor::new(Arc::new(Console::new()), InterceptMode::Proxy);
        interceptor.apply();

        for _ in 0..3 {
            let report = interceptor.apply();
            assert_eq!(report.rewritten, 0);
            assert!(interceptor.is_applied());
        }
    }

    #[test]
    fn proxy_mode_silences_channels_registered_later() {
        let console = Arc::new(Console::new());
        let interceptor = ConsoleInterceptor::new(Arc::clone(&console), InterceptMode::Proxy);
        interceptor.apply();

        // Unknown names resolve through the no-op resolver instead of failing.
        assert!(console.emit_named("memory", "ignored").is_ok());
    }

    #[test]
    fn direct_mode_leaves_unknown_names_unresolved() {
        let console = Arc::new(Console::new());
        let interceptor = ConsoleInterceptor::new(Arc::clone(&console), InterceptMode::Direct);
        let report = interceptor.apply();

        assert_eq!(report.strategy, Strategy::Direct);
        assert!(console.emit_named("memory", "ignored").is_err());
    }

    #[test]
    fn proxy_mode_falls_back_without_dynamic_resolution() {
        let console = Arc::new(Console::without_dynamic_resolution());
        let interceptor = ConsoleInterceptor::new(Arc::clone(&console), InterceptMode::Proxy);
        let report = interceptor.apply();

        assert_eq!(report.strategy, Strategy::DirectFallback);
        assert_eq!(report.rewritten, Channel::ALL.len());
        assert!(interceptor.is_applied());
    }

    #[test]
    fn apply_rewraps_channels_restored_by_third_parties() {
        let console = Arc::new(Console::new());
        let interceptor = ConsoleInterceptor::new(Arc::clone(&console), InterceptMode::Proxy);
        interceptor.apply();

        let lines = Arc::new(Mutex::new(Vec::new()));
        let sink_lines = Arc::clone(&lines);
        console.bind(
            Channel::Error,
            Binding::emit(move |msg| sink_lines.lock().unwrap().push(msg.to_string())),
        );
        console.bind_extension("profile", Binding::emit(|_| {}));
        assert!(!interceptor.is_applied());

        let report = interceptor.apply();
        assert_eq!(report.rewritten, 2);
        console.emit(Channel::Error, "after reassertion");
        assert!(lines.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn reassertion_task_rewraps_periodically() {
        let console = Arc::new(Console::new());
        let interceptor = Arc::new(ConsoleInterceptor::new(
            Arc::clone(&console),
            InterceptMode::Proxy,
        ));
        interceptor.apply();

        let task = tokio::spawn(
            Arc::clone(&interceptor).run_reassertion(ReassertInterval::from_millis(1_000)),
        );
        tokio::task::yield_now().await;

        console.bind(Channel::Log, Binding::emit(|_| {}));
        assert!(!interceptor.is_applied());

        tokio::time::sleep(Duration::from_millis(1_100)).await;
        assert!(interceptor.is_applied());

        task.abort();
    }
}
