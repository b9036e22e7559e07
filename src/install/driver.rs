// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

use crate::addons::{AddonUnit, InstallContext};
use crate::error::{OutfitterError, Result};
use crate::install::resolver::resolve;
use crate::kubernetes::ClusterClient;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstallOptions {
    /// Log a failed addon and move on instead of aborting the run
    pub continue_on_error: bool,
    /// Run each addon's health checks after its manifests are applied
    pub verify: bool,
}

impl Default for InstallOptions {
    fn default() -> Self {
        Self {
            continue_on_error: false,
            verify: true,
        }
    }
}

/// Progress of a single installation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Resolving,
    Installing(String),
    Verifying(String),
    Done,
    Aborted,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunState::Idle => write!(f, "Idle"),
            RunState::Resolving => write!(f, "Resolving"),
            RunState::Installing(addon) => write!(f, "Installing({})", addon),
            RunState::Verifying(addon) => write!(f, "Verifying({})", addon),
            RunState::Done => write!(f, "Done"),
            RunState::Aborted => write!(f, "Aborted"),
        }
    }
}

/// Outcome of a run that was not aborted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallReport {
    pub order: Vec<String>,
    pub installed: Vec<String>,
    /// (addon, error message)
    pub failed: Vec<(String, String)>,
    pub manifests_applied: usize,
}

impl InstallReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

pub struct Installer {
    client: Arc<dyn ClusterClient>,
    options: InstallOptions,
    state: RunState,
}

impl Installer {
    pub fn new(client: Arc<dyn ClusterClient>, options: InstallOptions) -> Self {
        Self {
            client,
            options,
            state: RunState::Idle,
        }
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    /// Resolve the units into an installation order and install them one at
    /// a time.
    ///
    /// Nothing is applied when the dependency graph has a cycle. Cancellation
    /// through the context's token always aborts the run, regardless of
    /// `continue_on_error`. Units installed before an abort are left in place.
    pub async fn run(
        &mut self,
        units: Vec<Box<dyn AddonUnit>>,
        ctx: &InstallContext,
    ) -> Result<InstallReport> {
        let mut report = InstallReport::default();

        self.transition(RunState::Resolving);
        let order = match resolve(units) {
            Ok(order) => order,
            Err(e) => {
                error!("Failed to resolve installation order: {}", e);
                self.transition(RunState::Aborted);
                return Err(e);
            }
        };
        report.order = order.names();

        if order.is_empty() {
            info!("No enabled addons, nothing to install");
            self.transition(RunState::Done);
            return Ok(report);
        }

        info!("Installing addons in order: {}", report.order.join(", "));

        for unit in order {
            let name = unit.name().to_string();
            let result = if ctx.cancel.is_cancelled() {
                Err(OutfitterError::Cancelled)
            } else {
                self.install_unit(unit.as_ref(), ctx, &mut report).await
            };

            match result {
                Ok(()) => {
                    info!("Addon {} installed", name);
                    report.installed.push(name);
                }
                Err(OutfitterError::Cancelled) => {
                    warn!("Installation cancelled while processing {}", name);
                    self.transition(RunState::Aborted);
                    return Err(OutfitterError::Cancelled);
                }
                Err(e) if self.options.continue_on_error => {
                    error!("Addon {} failed, continuing: {}", name, e);
                    report.failed.push((name, e.to_string()));
                }
                Err(e) => {
                    error!("Addon {} failed, aborting installation: {}", name, e);
                    self.transition(RunState::Aborted);
                    return Err(OutfitterError::AddonFailed {
                        addon: name,
                        source: Box::new(e),
                    });
                }
            }
        }

        self.transition(RunState::Done);
        info!(
            "Installation finished: {} installed, {} failed, {} manifests applied",
            report.installed.len(),
            report.failed.len(),
            report.manifests_applied
        );
        Ok(report)
    }

    #[instrument(skip(self, unit, ctx, report), fields(addon = %unit.name()))]
    async fn install_unit(
        &mut self,
        unit: &dyn AddonUnit,
        ctx: &InstallContext,
        report: &mut InstallReport,
    ) -> Result<()> {
        self.transition(RunState::Installing(unit.name().to_string()));

        let manifests = cancellable(&ctx.cancel, unit.generate_manifests(ctx)).await?;
        for manifest in manifests.iter().filter(|m| !m.trim().is_empty()) {
            cancellable(&ctx.cancel, self.client.apply(manifest, unit.namespace())).await?;
            report.manifests_applied += 1;
        }

        if self.options.verify {
            self.transition(RunState::Verifying(unit.name().to_string()));
            cancellable(&ctx.cancel, unit.verify(ctx, self.client.as_ref())).await?;
        }

        Ok(())
    }

    fn transition(&mut self, next: RunState) {
        debug!("Installer state {} -> {}", self.state, next);
        self.state = next;
    }
}

async fn cancellable<T, F>(cancel: &CancellationToken, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(OutfitterError::Cancelled),
        result = fut => result,
    }
}
