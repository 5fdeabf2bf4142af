// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;
use std::time::Duration;

use crate::errors::BootstrapError;
use crate::traits::PackageMeta;

/// Overall progress of a bootstrap run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BootstrapPhase {
    #[default]
    Idle,
    Validating,
    /// Running the package at this position in the sorted order
    Running(usize),
    Done,
    Failed,
}

impl fmt::Display for BootstrapPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BootstrapPhase::Idle => write!(f, "idle"),
            BootstrapPhase::Validating => write!(f, "validating"),
            BootstrapPhase::Running(index) => write!(f, "running({})", index),
            BootstrapPhase::Done => write!(f, "done"),
            BootstrapPhase::Failed => write!(f, "failed"),
        }
    }
}

/// Optional hooks into the bootstrap lifecycle.
///
/// Every method has an empty default, so observers only implement what they need.
pub trait LifecycleObserver: Send + Sync {
    fn on_phase(&self, _phase: BootstrapPhase) {}

    fn on_started(&self, _meta: &PackageMeta) {}

    fn on_completed(&self, _meta: &PackageMeta, _elapsed: Duration) {}

    /// `package` is `None` when the run failed before any setup routine started.
    fn on_failed(&self, _package: Option<&str>, _error: &BootstrapError) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl LifecycleObserver for NoopObserver {}
