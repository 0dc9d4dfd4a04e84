// SPDX-License-Identifier: MPL-2.0
//! Overlay placement.

use crate::config::DEFAULT_NARROW_VIEWPORT_WIDTH;

/// Where the overlay container sits in the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Anchor {
    /// Fixed-width column in the top-right corner.
    #[default]
    TopRight,
    /// Full-width column, centered, for narrow viewports.
    FullWidth,
}

impl Anchor {
    /// Picks the anchor for a viewport `width`, in logical pixels.
    ///
    /// ```
    /// use error_overlay::presenter::Anchor;
    ///
    /// assert_eq!(Anchor::for_width(1280.0, 768.0), Anchor::TopRight);
    /// assert_eq!(Anchor::for_width(390.0, 768.0), Anchor::FullWidth);
    /// ```
    #[must_use]
    pub fn for_width(width: f32, narrow_threshold: f32) -> Self {
        if width < narrow_threshold {
            Anchor::FullWidth
        } else {
            Anchor::TopRight
        }
    }

    /// Anchor for `width` using the default 768 px threshold.
    #[must_use]
    pub fn for_default_width(width: f32) -> Self {
        Self::for_width(width, DEFAULT_NARROW_VIEWPORT_WIDTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_is_exclusive() {
        assert_eq!(Anchor::for_default_width(767.9), Anchor::FullWidth);
        assert_eq!(Anchor::for_default_width(768.0), Anchor::TopRight);
    }

    #[test]
    fn default_is_top_right() {
        assert_eq!(Anchor::default(), Anchor::TopRight);
    }

    #[test]
    fn custom_threshold_is_honored() {
        assert_eq!(Anchor::for_width(900.0, 1024.0), Anchor::FullWidth);
        assert_eq!(Anchor::for_width(1024.0, 1024.0), Anchor::TopRight);
    }
}
