// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::any::Any;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::observability::messages::bootstrap::RegistrationIgnored;
use crate::observability::messages::StructuredLog;
use crate::traits::{Exports, SetupFailure};

/// Message from a setup routine to the orchestrator.
#[derive(Debug)]
pub(crate) enum Registration {
    Exports(Exports),
    Failed(SetupFailure),
}

/// The only handle a setup routine gets on the registry.
///
/// Cheap to clone and `Send + 'static`, so it can be moved into spawned tasks
/// that finish the setup asynchronously. Each package gets its own channel;
/// once the package completes, fails or times out the receiving side is gone
/// and further calls are logged and ignored.
#[derive(Debug, Clone)]
pub struct Registrar {
    package: Arc<str>,
    sender: mpsc::UnboundedSender<Registration>,
}

impl Registrar {
    pub(crate) fn channel(package: &str) -> (Self, mpsc::UnboundedReceiver<Registration>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (
            Self {
                package: Arc::from(package),
                sender,
            },
            receiver,
        )
    }

    /// Merge a batch of capabilities into the registry.
    ///
    /// Returns `false` if the package is no longer active and the batch was dropped.
    pub fn register(&self, exports: Exports) -> bool {
        self.send(Registration::Exports(exports))
    }

    /// Register a single capability.
    pub fn register_one<T: Any + Send + Sync>(&self, name: impl Into<String>, value: T) -> bool {
        self.register(Exports::new().with(name, value))
    }

    /// Report that setup failed; the whole bootstrap aborts.
    pub fn fail(&self, reason: impl Into<SetupFailure>) -> bool {
        self.send(Registration::Failed(reason.into()))
    }

    /// Whether the orchestrator is still listening for this package.
    pub fn is_active(&self) -> bool {
        !self.sender.is_closed()
    }

    /// Name of the package this registrar belongs to.
    pub fn package(&self) -> &str {
        &self.package
    }

    fn send(&self, registration: Registration) -> bool {
        match self.sender.send(registration) {
            Ok(()) => true,
            Err(_) => {
                RegistrationIgnored {
                    package: &self.package,
                }
                .log();
                false
            }
        }
    }
}
