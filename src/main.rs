// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::{bail, Result};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use outfitter::addons::{AddonUnit, InstallContext};
use outfitter::config::{ClusterConfig, Config};
use outfitter::install::{InstallOptions, Installer};
use outfitter::kubernetes::KubeClusterClient;
use outfitter::render::{DirectoryBundle, HelmRenderer};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting Outfitter addon installer");

    // Load configuration
    let config = Config::from_env()?;
    info!(
        "Configuration loaded: config={}, charts_dir={}, continue_on_error={}, verify={}",
        config.config_path.display(),
        config.charts_dir.display(),
        config.continue_on_error,
        config.verify
    );

    let units: Vec<Box<dyn AddonUnit>> = ClusterConfig::load(&config.config_path)?
        .into_units()?
        .into_iter()
        .map(|unit| Box::new(unit) as Box<dyn AddonUnit>)
        .collect();
    info!("Loaded {} addons", units.len());

    // Create Kubernetes client
    let client = KubeClusterClient::connect(&config).await?;
    info!("Connected to Kubernetes cluster");

    let bundle = Arc::new(DirectoryBundle::new(config.charts_dir.clone()));
    let renderer = Arc::new(HelmRenderer::new(config.helm_binary.clone(), bundle));

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, cancelling installation");
            on_signal.cancel();
        }
    });

    let ctx = InstallContext::new(renderer, config.verify_timeout).with_cancel(cancel);
    let mut installer = Installer::new(
        Arc::new(client),
        InstallOptions {
            continue_on_error: config.continue_on_error,
            verify: config.verify,
        },
    );

    let report = installer.run(units, &ctx).await?;
    for (addon, message) in &report.failed {
        error!("Addon {} failed: {}", addon, message);
    }
    if !report.is_success() {
        bail!(
            "{} of {} addons failed to install",
            report.failed.len(),
            report.order.len()
        );
    }

    info!(
        "Installed {} addons ({} manifests applied)",
        report.installed.len(),
        report.manifests_applied
    );
    Ok(())
}
