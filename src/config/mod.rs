// SPDX-License-Identifier: MPL-2.0
//! This module handles the crate's configuration, loaded from a `settings.toml`
//! file.
//!
//! # Configuration Sections
//!
//! - `[overlay]` - Rate limit, display duration and narrow-viewport threshold
//! - `[console]` - Whether and how the console facade is silenced
//! - `[logging]` - `tracing` filter directive
//!
//! Every value is optional; missing values fall back to the constants in
//! [`defaults`]. Timing values are clamped into range when read.
//!
//! # Path Resolution
//!
//! 1. Use `load_from_path()`/`save_to_path()` with explicit path
//! 2. Pass a directory to `load_with_override()` (the `--config-dir` flag)
//! 3. Set `ERROR_OVERLAY_CONFIG_DIR` environment variable
//! 4. Falls back to platform-specific config directory
//!
//! # Examples
//!
//! ```no_run
//! use error_overlay::config;
//!
//! let (mut config, _warning) = config::load();
//! config.overlay.rate_limit_ms = Some(5_000);
//! config::save(&config).expect("Failed to save config");
//! ```

pub mod defaults;

pub use defaults::*;

use crate::console::InterceptMode;
use crate::domain::overlay::{DisplayDuration, RateLimit, ReassertInterval};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "settings.toml";
const APP_NAME: &str = "ErrorOverlay";

/// Environment variable to override the config directory.
pub const ENV_CONFIG_DIR: &str = "ERROR_OVERLAY_CONFIG_DIR";

// =============================================================================
// Section Structs
// =============================================================================

/// Settings of the notification overlay.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OverlayConfig {
    /// Minimum spacing between two notifications appearing, in milliseconds.
    #[serde(
        default = "default_rate_limit_ms",
        skip_serializing_if = "Option::is_none"
    )]
    pub rate_limit_ms: Option<u64>,

    /// How long each notification stays mounted, in milliseconds.
    #[serde(
        default = "default_display_duration_ms",
        skip_serializing_if = "Option::is_none"
    )]
    pub display_duration_ms: Option<u64>,

    /// Viewport width below which the overlay spans the full width.
    #[serde(
        default = "default_narrow_viewport_width",
        skip_serializing_if = "Option::is_none"
    )]
    pub narrow_viewport_width: Option<f32>,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            rate_limit_ms: default_rate_limit_ms(),
            display_duration_ms: default_display_duration_ms(),
            narrow_viewport_width: default_narrow_viewport_width(),
        }
    }
}

impl OverlayConfig {
    #[must_use]
    pub fn rate_limit(&self) -> RateLimit {
        self.rate_limit_ms
            .map_or_else(RateLimit::default, RateLimit::from_millis)
    }

    #[must_use]
    pub fn display_duration(&self) -> DisplayDuration {
        self.display_duration_ms
            .map_or_else(DisplayDuration::default, DisplayDuration::from_millis)
    }

    /// Returns the narrow threshold, ignoring non-positive or non-finite values.
    #[must_use]
    pub fn narrow_viewport_width(&self) -> f32 {
        match self.narrow_viewport_width {
            Some(width) if width.is_finite() && width > 0.0 => width,
            _ => DEFAULT_NARROW_VIEWPORT_WIDTH,
        }
    }
}

/// Settings of the console interceptor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConsoleConfig {
    /// When `false`, console output is left untouched (development builds).
    #[serde(default = "default_silence", skip_serializing_if = "Option::is_none")]
    pub silence: Option<bool>,

    #[serde(default = "default_mode", skip_serializing_if = "Option::is_none")]
    pub mode: Option<InterceptMode>,

    #[serde(
        default = "default_reassert_interval_ms",
        skip_serializing_if = "Option::is_none"
    )]
    pub reassert_interval_ms: Option<u64>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            silence: default_silence(),
            mode: default_mode(),
            reassert_interval_ms: default_reassert_interval_ms(),
        }
    }
}

impl ConsoleConfig {
    #[must_use]
    pub fn silence(&self) -> bool {
        self.silence.unwrap_or(true)
    }

    #[must_use]
    pub fn mode(&self) -> InterceptMode {
        self.mode.unwrap_or_default()
    }

    #[must_use]
    pub fn reassert_interval(&self) -> ReassertInterval {
        self.reassert_interval_ms
            .map_or_else(ReassertInterval::default, ReassertInterval::from_millis)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// `tracing` filter directive, e.g. `"info"` or `"error_overlay=debug"`.
    #[serde(default = "default_log_level", skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl LoggingConfig {
    #[must_use]
    pub fn level(&self) -> &str {
        self.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }
}

// =============================================================================
// Main Config Struct (Sectioned)
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub overlay: OverlayConfig,

    #[serde(default)]
    pub console: ConsoleConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

// =============================================================================
// Serde Default Functions
// =============================================================================

fn default_rate_limit_ms() -> Option<u64> {
    Some(DEFAULT_RATE_LIMIT_MS)
}

fn default_display_duration_ms() -> Option<u64> {
    Some(DEFAULT_DISPLAY_DURATION_MS)
}

fn default_narrow_viewport_width() -> Option<f32> {
    Some(DEFAULT_NARROW_VIEWPORT_WIDTH)
}

fn default_silence() -> Option<bool> {
    Some(true)
}

fn default_mode() -> Option<InterceptMode> {
    Some(InterceptMode::default())
}

fn default_reassert_interval_ms() -> Option<u64> {
    Some(DEFAULT_REASSERT_INTERVAL_MS)
}

fn default_log_level() -> Option<String> {
    Some(DEFAULT_LOG_LEVEL.to_string())
}

// =============================================================================
// Config Path Resolution
// =============================================================================

/// Resolves the config directory: explicit override, then env var, then platform default.
fn get_config_dir_with_override(base_dir: Option<PathBuf>) -> Option<PathBuf> {
    if base_dir.is_some() {
        return base_dir;
    }
    if let Some(dir) = std::env::var_os(ENV_CONFIG_DIR).filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(dir));
    }
    dirs::config_dir().map(|mut path| {
        path.push(APP_NAME);
        path
    })
}

fn get_config_path_with_override(base_dir: Option<PathBuf>) -> Option<PathBuf> {
    get_config_dir_with_override(base_dir).map(|mut path| {
        path.push(CONFIG_FILE);
        path
    })
}

// =============================================================================
// Load Functions
// =============================================================================

/// Loads the configuration from the default path.
///
/// Returns a tuple of (config, optional_warning). If loading fails, returns
/// default config with a warning message explaining what went wrong.
pub fn load() -> (Config, Option<String>) {
    load_with_override(None)
}

/// Loads the configuration from a custom directory.
pub fn load_with_override(base_dir: Option<PathBuf>) -> (Config, Option<String>) {
    if let Some(path) = get_config_path_with_override(base_dir) {
        if path.exists() {
            match load_from_path(&path) {
                Ok(config) => return (config, None),
                Err(err) => {
                    return (
                        Config::default(),
                        Some(format!(
                            "ignoring {}: {err}; using defaults",
                            path.display()
                        )),
                    );
                }
            }
        }
    }
    (Config::default(), None)
}

/// Loads configuration from a specific path.
///
/// # Errors
///
/// Returns `Error::Io` if the file cannot be read and `Error::Config`
/// if it is not valid TOML for [`Config`].
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

// =============================================================================
// Save Functions
// =============================================================================

/// Saves the configuration to the default path.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn save(config: &Config) -> Result<()> {
    save_with_override(config, None)
}

/// Saves the configuration to a custom directory.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn save_with_override(config: &Config, base_dir: Option<PathBuf>) -> Result<()> {
    if let Some(path) = get_config_path_with_override(base_dir) {
        return save_to_path(config, &path);
    }
    Ok(())
}

/// Saves configuration to a specific path, creating parent directories.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config).map_err(Error::from)?;
    fs::write(path, content)?;
    Ok(())
}
