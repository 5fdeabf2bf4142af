// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! Message types follow a struct-based pattern with `Display` so log text is
//! not scattered through the engine as magic strings. [`TracingObserver`] is the
//! default lifecycle observer and reports bootstrap progress through them.
//!
//! # Usage
//!
//! ```rust
//! use the_dipper::observability::messages::bootstrap::PackageSetupStarted;
//!
//! let msg = PackageSetupStarted {
//!     package: "database",
//!     position: 0,
//!     import_count: 2,
//! };
//!
//! tracing::debug!("{}", msg);
//! ```

pub mod messages;

use std::time::Duration;

use crate::errors::BootstrapError;
use crate::observability::messages::bootstrap::{BootstrapFailed, PackageSetupCompleted};
use crate::observability::messages::StructuredLog;
use crate::traits::{BootstrapPhase, LifecycleObserver, PackageMeta};

/// Lifecycle observer that writes bootstrap progress to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl LifecycleObserver for TracingObserver {
    fn on_phase(&self, phase: BootstrapPhase) {
        tracing::trace!(phase = %phase, "Bootstrap phase changed");
    }

    fn on_completed(&self, meta: &PackageMeta, elapsed: Duration) {
        PackageSetupCompleted {
            package: &meta.name,
            provided: &meta.provides,
            duration: elapsed,
        }
        .log();
    }

    fn on_failed(&self, package: Option<&str>, error: &BootstrapError) {
        BootstrapFailed { package, error }.log();
    }
}
