// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Addon units: independently installable cluster components.

pub mod catalog;
pub mod chart;

use crate::error::Result;
use crate::kubernetes::ClusterClient;
use crate::render::ChartRenderer;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

pub use chart::{ChartAddon, PatchSpec, VerifySpec, WorkloadRef};

/// Shared state handed to units while they generate manifests and verify.
#[derive(Clone)]
pub struct InstallContext {
    pub renderer: Arc<dyn ChartRenderer>,
    pub cancel: CancellationToken,
    /// Upper bound for a single unit's verification
    pub verify_timeout: Duration,
}

impl InstallContext {
    pub fn new(renderer: Arc<dyn ChartRenderer>, verify_timeout: Duration) -> Self {
        Self {
            renderer,
            cancel: CancellationToken::new(),
            verify_timeout,
        }
    }

    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }
}

#[async_trait]
pub trait AddonUnit: Send + Sync {
    fn name(&self) -> &str;

    /// Read once when the installation order is resolved
    fn enabled(&self) -> bool;

    /// Namespace for generated objects that do not set one themselves
    fn namespace(&self) -> Option<&str> {
        None
    }

    /// Names of units that must be installed before this one
    fn dependencies(&self) -> Vec<String>;

    /// Produce the manifests to apply, in order
    async fn generate_manifests(&self, ctx: &InstallContext) -> Result<Vec<String>>;

    /// Check the unit is healthy after its manifests were applied
    async fn verify(&self, _ctx: &InstallContext, _client: &dyn ClusterClient) -> Result<()> {
        Ok(())
    }
}
