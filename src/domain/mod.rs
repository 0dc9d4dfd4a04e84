// SPDX-License-Identifier: MPL-2.0
//! Domain layer - Core value objects with ZERO external dependencies.
//!
//! # Modules
//!
//! - [`overlay`]: Overlay timing types ([`RateLimit`](overlay::RateLimit),
//!   [`DisplayDuration`](overlay::DisplayDuration),
//!   [`ReassertInterval`](overlay::ReassertInterval))

pub mod overlay;
