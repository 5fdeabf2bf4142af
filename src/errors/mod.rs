// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod bootstrap;
mod loader;

pub use bootstrap::{BootstrapError, MissingCapability};
pub use loader::LoaderError;
