// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::traits::PackageMeta;

/// Lifecycle of a single package's setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentState {
    Pending,
    Running,
    Complete,
    TimedOut,
}

/// Tracks which declared capabilities a running package still owes.
///
/// Only the package's own registrations count: a key that happens to be in
/// the registry already does not satisfy anything here.
#[derive(Debug, Clone)]
pub struct PendingSetup {
    package: String,
    missing: Vec<String>,
    state: ComponentState,
}

impl PendingSetup {
    pub fn new(meta: &PackageMeta) -> Self {
        let mut missing: Vec<String> = Vec::with_capacity(meta.provides.len());
        for capability in &meta.provides {
            if !missing.contains(capability) {
                missing.push(capability.clone());
            }
        }

        Self {
            package: meta.name.clone(),
            missing,
            state: ComponentState::Pending,
        }
    }

    /// `Pending -> Running`; a package that declares nothing completes at once.
    pub fn start(&mut self) -> ComponentState {
        if self.state == ComponentState::Pending {
            self.state = ComponentState::Running;
            self.settle();
        }
        self.state
    }

    /// Account for capabilities this package just wrote.
    ///
    /// Ignored unless the package is running. Returns true once complete.
    pub fn record(&mut self, written: &[String]) -> bool {
        if self.state != ComponentState::Running {
            return self.is_complete();
        }
        self.missing.retain(|capability| !written.contains(capability));
        self.settle();
        self.is_complete()
    }

    /// `Running -> TimedOut`.
    pub fn time_out(&mut self) {
        if self.state == ComponentState::Running {
            self.state = ComponentState::TimedOut;
        }
    }

    pub fn is_complete(&self) -> bool {
        self.state == ComponentState::Complete
    }

    pub fn state(&self) -> ComponentState {
        self.state
    }

    /// Declared capabilities not yet registered, in declaration order.
    pub fn missing(&self) -> &[String] {
        &self.missing
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    fn settle(&mut self) {
        if self.state == ComponentState::Running && self.missing.is_empty() {
            self.state = ComponentState::Complete;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending(provides: &[&str]) -> PendingSetup {
        PendingSetup::new(&PackageMeta::new("pkg").with_provides(provides.iter().copied()))
    }

    #[test]
    fn test_package_without_provisions_completes_on_start() {
        let mut setup = pending(&[]);
        assert_eq!(setup.state(), ComponentState::Pending);
        assert_eq!(setup.start(), ComponentState::Complete);
    }

    #[test]
    fn test_partial_registrations_accumulate() {
        let mut setup = pending(&["a", "b", "c"]);
        setup.start();

        assert!(!setup.record(&["b".to_string()]));
        assert_eq!(setup.missing(), &["a", "c"]);

        assert!(!setup.record(&["unrelated".to_string()]));
        assert!(setup.record(&["a".to_string(), "c".to_string()]));
        assert_eq!(setup.state(), ComponentState::Complete);
    }

    #[test]
    fn test_registrations_before_start_are_ignored() {
        let mut setup = pending(&["a"]);
        assert!(!setup.record(&["a".to_string()]));
        assert_eq!(setup.missing(), &["a"]);
    }

    #[test]
    fn test_timed_out_setup_cannot_be_revived() {
        let mut setup = pending(&["a"]);
        setup.start();
        setup.time_out();

        assert!(!setup.record(&["a".to_string()]));
        assert_eq!(setup.state(), ComponentState::TimedOut);
        assert_eq!(setup.missing(), &["a"]);
    }

    #[test]
    fn test_duplicate_declarations_count_once() {
        let setup = pending(&["a", "a"]);
        assert_eq!(setup.missing(), &["a"]);
    }
}
