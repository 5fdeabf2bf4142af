// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message type implements `Display` for human-readable output and
//! [`StructuredLog`] to emit itself with structured fields at its own level.
//!
//! # Organization
//!
//! * `bootstrap` - bootstrap lifecycle, per-package setup, registrations
//! * `loader` - config and manifest loading, entry point resolution
//! * `validation` - package set validation failures
//!
//! # Usage Pattern
//!
//! ```rust
//! use the_dipper::observability::messages::bootstrap::BootstrapStarted;
//! use the_dipper::observability::messages::StructuredLog;
//!
//! let msg = BootstrapStarted {
//!     package_count: 5,
//!     setup_timeout: std::time::Duration::from_millis(150),
//! };
//!
//! msg.log();
//! ```

use tracing::Span;

pub mod bootstrap;
pub mod loader;
pub mod validation;

/// A log message that knows its own level and structured fields.
pub trait StructuredLog {
    /// Emit the message as a tracing event.
    fn log(&self);

    /// Open a span carrying the message's fields.
    fn span(&self, name: &str) -> Span;
}
