// SPDX-License-Identifier: MPL-2.0
//! Crate-wide error type.
//!
//! Errors raised by the application and reported to the overlay are *not*
//! represented here; they travel as [`crate::capture::CapturedError`]. This
//! type covers failures of the subsystem's own plumbing (configuration, the
//! console facade, initialization).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(String),

    /// A console channel name resolved to nothing.
    #[error("console channel `{0}` is not bound")]
    UnknownChannel(String),

    /// The console was built without dynamic channel resolution.
    #[error("console does not support dynamic channel resolution")]
    ResolverUnsupported,

    #[error("logging setup failed: {0}")]
    Logging(String),

    /// `ErrorOverlay::init` was called while another instance is live.
    #[error("error overlay is already initialized")]
    AlreadyInitialized,
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_converts_and_displays() {
        let err: Error = std::io::Error::new(std::io::ErrorKind::NotFound, "missing").into();
        assert!(matches!(err, Error::Io(_)));
        assert_eq!(err.to_string(), "I/O error: missing");
    }

    #[test]
    fn toml_error_becomes_config_error() {
        let parse = toml::from_str::<toml::Table>("not = valid = toml").unwrap_err();
        let err = Error::from(parse);
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().starts_with("config error:"));
    }

    #[test]
    fn unknown_channel_names_the_channel() {
        let err = Error::UnknownChannel("profile".to_string());
        assert_eq!(err.to_string(), "console channel `profile` is not bound");
    }
}
