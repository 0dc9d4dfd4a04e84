// SPDX-License-Identifier: MPL-2.0
//! Console facade.
//!
//! Application code writes diagnostics through a [`Console`] instead of
//! printing directly. Every channel is a [`Binding`]: either a sink that
//! forwards to `tracing`, or a no-op. Rebinding channels at runtime is what
//! third-party code does when it installs its own logger, and what the
//! [`ConsoleInterceptor`] undoes.
//!
//! # Channels
//!
//! - Known channels ([`Channel`]) are always present.
//! - Extension channels are registered by name at runtime.
//! - Any other name goes through the *resolver*, a catch-all binding that
//!   makes the console behave like a transparent proxy. Consoles built with
//!   [`Console::without_dynamic_resolution`] have no resolver.
//!
//! # Usage
//!
//! ```
//! use error_overlay::console::{Binding, Channel, Console};
//!
//! let console = Console::new();
//! console.emit(Channel::Info, "catalog refreshed");
//!
//! console.bind(Channel::Info, Binding::Noop);
//! assert!(console.binding(Channel::Info).is_noop());
//! ```

mod interceptor;

pub use interceptor::{ConsoleInterceptor, InterceptMode, InterceptReport, Strategy};

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock, PoisonError, RwLock};

/// Output function of a channel.
pub type Sink = Arc<dyn Fn(&str) + Send + Sync>;

/// The standard console channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Log,
    Info,
    Debug,
    Warn,
    Error,
    Trace,
    Table,
    Dir,
    Group,
    GroupCollapsed,
    GroupEnd,
    Time,
    TimeEnd,
    TimeLog,
    Count,
    CountReset,
    Assert,
    Clear,
}

impl Channel {
    /// Every known channel, in declaration order.
    pub const ALL: [Channel; 18] = [
        Channel::Log,
        Channel::Info,
        Channel::Debug,
        Channel::Warn,
        Channel::Error,
        Channel::Trace,
        Channel::Table,
        Channel::Dir,
        Channel::Group,
        Channel::GroupCollapsed,
        Channel::GroupEnd,
        Channel::Time,
        Channel::TimeEnd,
        Channel::TimeLog,
        Channel::Count,
        Channel::CountReset,
        Channel::Assert,
        Channel::Clear,
    ];

    /// Returns the conventional name of the channel.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Channel::Log => "log",
            Channel::Info => "info",
            Channel::Debug => "debug",
            Channel::Warn => "warn",
            Channel::Error => "error",
            Channel::Trace => "trace",
            Channel::Table => "table",
            Channel::Dir => "dir",
            Channel::Group => "group",
            Channel::GroupCollapsed => "groupCollapsed",
            Channel::GroupEnd => "groupEnd",
            Channel::Time => "time",
            Channel::TimeEnd => "timeEnd",
            Channel::TimeLog => "timeLog",
            Channel::Count => "count",
            Channel::CountReset => "countReset",
            Channel::Assert => "assert",
            Channel::Clear => "clear",
        }
    }

    /// Looks a channel up by its conventional name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|channel| channel.name() == name)
    }

    /// Default sink: forwards to the matching `tracing` level.
    fn tracing_sink(self) -> Sink {
        let name = self.name();
        match self {
            Channel::Error | Channel::Assert => {
                Arc::new(move |msg: &str| tracing::error!(channel = name, "{msg}"))
            }
            Channel::Warn => Arc::new(move |msg: &str| tracing::warn!(channel = name, "{msg}")),
            Channel::Debug => Arc::new(move |msg: &str| tracing::debug!(channel = name, "{msg}")),
            Channel::Trace => Arc::new(move |msg: &str| tracing::trace!(channel = name, "{msg}")),
            _ => Arc::new(move |msg: &str| tracing::info!(channel = name, "{msg}")),
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a channel does when written to.
#[derive(Clone)]
pub enum Binding {
    Emit(Sink),
    Noop,
}

impl Binding {
    /// Wraps a closure as an emitting binding.
    pub fn emit(sink: impl Fn(&str) + Send + Sync + 'static) -> Self {
        Binding::Emit(Arc::new(sink))
    }

    #[must_use]
    pub fn is_noop(&self) -> bool {
        matches!(self, Binding::Noop)
    }

    fn call(&self, message: &str) {
        if let Binding::Emit(sink) = self {
            sink(message);
        }
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binding::Emit(_) => f.write_str("Emit(..)"),
            Binding::Noop => f.write_str("Noop"),
        }
    }
}

/// Process-wide logging facade with rebindable channels.
pub struct Console {
    known: RwLock<HashMap<Channel, Binding>>,
    extensions: RwLock<HashMap<String, Binding>>,
    resolver: RwLock<Option<Binding>>,
    dynamic_resolution: bool,
}

impl Console {
    /// Creates a console whose known channels forward to `tracing`.
    #[must_use]
    pub fn new() -> Self {
        Self::build(true)
    }

    /// Creates a console that cannot install a catch-all resolver.
    #[must_use]
    pub fn without_dynamic_resolution() -> Self {
        Self::build(false)
    }

    fn build(dynamic_resolution: bool) -> Self {
        let known = Channel::ALL
            .into_iter()
            .map(|channel| (channel, Binding::Emit(channel.tracing_sink())))
            .collect();
        Self {
            known: RwLock::new(known),
            extensions: RwLock::new(HashMap::new()),
            resolver: RwLock::new(None),
            dynamic_resolution,
        }
    }

    /// Whether a catch-all resolver can be installed.
    #[must_use]
    pub fn supports_dynamic_resolution(&self) -> bool {
        self.dynamic_resolution
    }

    /// Rebinds a known channel.
    pub fn bind(&self, channel: Channel, binding: Binding) {
        self.known
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(channel, binding);
    }

    /// Registers or rebinds a named extension channel.
    ///
    /// Names of known channels rebind the known channel instead.
    pub fn bind_extension(&self, name: impl Into<String>, binding: Binding) {
        let name = name.into();
        if let Some(channel) = Channel::from_name(&name) {
            self.bind(channel, binding);
            return;
        }
        self.extensions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name, binding);
    }

    /// Returns the current binding of a known channel.
    #[must_use]
    pub fn binding(&self, channel: Channel) -> Binding {
        self.known
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&channel)
            .cloned()
            .unwrap_or(Binding::Noop)
    }

    /// Returns the names of all registered extension channels.
    #[must_use]
    pub fn extension_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .extensions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    /// Installs the catch-all binding for unknown channel names.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ResolverUnsupported`] if the console was built
    /// without dynamic resolution.
    pub fn install_resolver(&self, binding: Binding) -> Result<()> {
        if !self.dynamic_resolution {
            return Err(Error::ResolverUnsupported);
        }
        *self.resolver.write().unwrap_or_else(PoisonError::into_inner) = Some(binding);
        Ok(())
    }

    /// Whether a resolver is installed and silent.
    #[must_use]
    pub fn resolver_is_noop(&self) -> bool {
        self.resolver
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(Binding::is_noop)
    }

    /// Writes a message to a known channel.
    pub fn emit(&self, channel: Channel, message: &str) {
        let binding = self.binding(channel);
        binding.call(message);
    }

    /// Writes a message to a channel by name.
    ///
    /// Resolution order: known channel, extension channel, resolver.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownChannel`] if nothing resolves the name.
    pub fn emit_named(&self, name: &str, message: &str) -> Result<()> {
        if let Some(channel) = Channel::from_name(name) {
            self.emit(channel, message);
            return Ok(());
        }

        let extension = self
            .extensions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned();
        let binding = match extension {
            Some(binding) => binding,
            None => self
                .resolver
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
                .ok_or_else(|| Error::UnknownChannel(name.to_string()))?,
        };
        binding.call(message);
        Ok(())
    }

    /// Whether every known and extension channel is bound to `Noop`.
    #[must_use]
    pub fn is_silent(&self) -> bool {
        let known_silent = self
            .known
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .all(Binding::is_noop);
        known_silent
            && self
                .extensions
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .values()
                .all(Binding::is_noop)
    }

    /// Replaces every non-silent known and extension binding with `Noop`.
    ///
    /// Returns how many bindings were rewritten.
    fn silence_bindings(&self) -> usize {
        let mut rewritten = 0;

        let mut known = self.known.write().unwrap_or_else(PoisonError::into_inner);
        for channel in Channel::ALL {
            let entry = known.entry(channel).or_insert(Binding::Noop);
            if !entry.is_noop() {
                *entry = Binding::Noop;
                rewritten += 1;
            }
        }
        drop(known);

        let mut extensions = self
            .extensions
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        for binding in extensions.values_mut() {
            if !binding.is_noop() {
                *binding = Binding::Noop;
                rewritten += 1;
            }
        }

        rewritten
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Console {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Console")
            .field("extensions", &self.extension_names())
            .field("dynamic_resolution", &self.dynamic_resolution)
            .finish_non_exhaustive()
    }
}

static GLOBAL_CONSOLE: LazyLock<Arc<Console>> = LazyLock::new(|| Arc::new(Console::new()));

/// Returns the process-wide console.
#[must_use]
pub fn global() -> Arc<Console> {
    Arc::clone(&GLOBAL_CONSOLE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn recording() -> (Binding, Arc<Mutex<Vec<String>>>) {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let sink_lines = Arc::clone(&lines);
        let binding = Binding::emit(move |msg| sink_lines.lock().unwrap().push(msg.to_string()));
        (binding, lines)
    }

    #[test]
    fn channel_names_round_trip() {
        for channel in Channel::ALL {
            assert_eq!(Channel::from_name(channel.name()), Some(channel));
        }
        assert_eq!(Channel::from_name("profile"), None);
    }

    #[test]
    fn new_console_binds_every_known_channel() {
        let console = Console::new();
        for channel in Channel::ALL {
            assert!(!console.binding(channel).is_noop(), "{channel} is silent");
        }
    }

    #[test]
    fn rebinding_a_channel_replaces_its_sink() {
        let console = Console::new();
        let (binding, lines) = recording();
        console.bind(Channel::Warn, binding);

        console.emit(Channel::Warn, "slow response");
        console.bind(Channel::Warn, Binding::Noop);
        console.emit(Channel::Warn, "dropped");

        assert_eq!(*lines.lock().unwrap(), vec!["slow response".to_string()]);
    }

    #[test]
    fn emit_named_resolves_extensions_before_resolver() {
        let console = Console::new();
        let (extension, ext_lines) = recording();
        let (resolver, resolver_lines) = recording();
        console.bind_extension("profile", extension);
        console.install_resolver(resolver).unwrap();

        console.emit_named("profile", "p").unwrap();
        console.emit_named("memory", "m").unwrap();

        assert_eq!(*ext_lines.lock().unwrap(), vec!["p".to_string()]);
        assert_eq!(*resolver_lines.lock().unwrap(), vec!["m".to_string()]);
    }

    #[test]
    fn emit_named_without_resolver_is_an_error() {
        let console = Console::new();
        let result = console.emit_named("memory", "m");
        assert!(matches!(result, Err(Error::UnknownChannel(name)) if name == "memory"));
    }

    #[test]
    fn bind_extension_with_known_name_rebinds_known_channel() {
        let console = Console::new();
        console.bind_extension("warn", Binding::Noop);
        assert!(console.binding(Channel::Warn).is_noop());
        assert!(console.extension_names().is_empty());
    }

    #[test]
    fn resolver_is_rejected_without_dynamic_resolution() {
        let console = Console::without_dynamic_resolution();
        assert!(!console.supports_dynamic_resolution());
        assert!(matches!(
            console.install_resolver(Binding::Noop),
            Err(Error::ResolverUnsupported)
        ));
        assert!(!console.resolver_is_noop());
    }

    #[test]
    fn silence_bindings_counts_only_rewrites() {
        let console = Console::new();
        console.bind_extension("profile", Binding::emit(|_| {}));

        assert_eq!(console.silence_bindings(), Channel::ALL.len() + 1);
        assert_eq!(console.silence_bindings(), 0);
    }
}
