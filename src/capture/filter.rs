// SPDX-License-Identifier: MPL-2.0
//! Relevance filter.
//!
//! Only transport and security failures are worth showing to end users; every
//! other error is dropped silently. The decision is a case-insensitive
//! substring match of the formatted message against a keyword list.

use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

use crate::error::{Error, Result};

/// Keywords that mark an error as a connectivity or security failure.
pub const DEFAULT_KEYWORDS: [&str; 6] = [
    "ssl",
    "certificate",
    "https",
    "secure connection",
    "security",
    "tls",
];

static DEFAULT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    build_pattern(&DEFAULT_KEYWORDS)
        .ok()
        .flatten()
        .expect("default keyword regex should compile")
});

/// Builds `(?:kw1|kw2|...)`, case-insensitive. `None` for an empty list.
fn build_pattern<S: AsRef<str>>(keywords: &[S]) -> std::result::Result<Option<Regex>, regex::Error> {
    let alternatives: Vec<String> = keywords
        .iter()
        .map(AsRef::as_ref)
        .filter(|kw| !kw.is_empty())
        .map(regex::escape)
        .collect();
    if alternatives.is_empty() {
        return Ok(None);
    }
    RegexBuilder::new(&format!("(?:{})", alternatives.join("|")))
        .case_insensitive(true)
        .build()
        .map(Some)
}

/// Decides which captured errors reach the overlay.
#[derive(Debug, Clone)]
pub struct RelevanceFilter {
    /// `None` matches nothing.
    pattern: Option<Regex>,
}

impl RelevanceFilter {
    /// The fixed transport/security keyword filter.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pattern: Some(DEFAULT_PATTERN.clone()),
        }
    }

    /// Builds a filter from a custom keyword list. Empty keywords are ignored;
    /// an empty list matches nothing.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the combined pattern exceeds regex limits.
    pub fn with_keywords<S: AsRef<str>>(keywords: &[S]) -> Result<Self> {
        let pattern = build_pattern(keywords).map_err(|e| Error::Config(e.to_string()))?;
        Ok(Self { pattern })
    }

    /// Returns `true` if `message` mentions any keyword.
    #[must_use]
    pub fn is_relevant(&self, message: &str) -> bool {
        self.pattern
            .as_ref()
            .is_some_and(|pattern| pattern.is_match(message))
    }
}

impl Default for RelevanceFilter {
    fn default() -> Self {
        Self::new()
    }
}
