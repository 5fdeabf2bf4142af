// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use crate::errors::LoaderError;
use crate::traits::ComponentRecord;

/// Supplies the ordered package records a bootstrap run works on.
///
/// The engine never touches the file system itself; anything that can produce
/// records (a manifest on disk, a hard-coded list, a test fixture) plugs in here.
#[async_trait]
pub trait ComponentSource: Send + Sync {
    async fn load(&self) -> Result<Vec<ComponentRecord>, LoaderError>;
}

#[async_trait]
impl ComponentSource for Vec<ComponentRecord> {
    async fn load(&self) -> Result<Vec<ComponentRecord>, LoaderError> {
        Ok(self.clone())
    }
}
