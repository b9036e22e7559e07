// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Addon unit that installs one rendered chart

use crate::addons::{AddonUnit, InstallContext};
use crate::constants::verify::PROBE_SECRET_NAME;
use crate::error::{OutfitterError, Result};
use crate::kubernetes::{namespace_manifest, wait_until, ClusterClient};
use crate::manifest::{dns_policy_patch, host_network_api_patch_with, ManifestPatch};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::future::Future;
use tracing::{debug, info, instrument};

/// A correction applied to the rendered chart output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchSpec {
    /// Override the DNS policy of a Deployment
    DnsPolicy { target: String, policy: String },
    /// Point a host-networked DaemonSet or Deployment at the API server directly
    HostNetworkApi {
        target: String,
        host: String,
        port: String,
    },
}

impl PatchSpec {
    pub fn to_patch(&self) -> ManifestPatch<'_> {
        match self {
            PatchSpec::DnsPolicy { target, policy } => dns_policy_patch(target, policy),
            PatchSpec::HostNetworkApi { target, host, port } => {
                host_network_api_patch_with(target, host, port)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkloadRef {
    pub kind: String,
    pub name: String,
    /// Defaults to the addon namespace
    pub namespace: Option<String>,
}

/// Post-install health checks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerifySpec {
    /// (group, kind) pairs that must be served
    pub crds: Vec<(String, String)>,
    pub workloads: Vec<WorkloadRef>,
    /// Write and remove a throwaway secret to prove admission accepts writes
    pub secret_probe: bool,
}

#[derive(Debug, Clone)]
pub struct ChartAddon {
    pub name: String,
    pub enabled: bool,
    pub chart: String,
    pub namespace: String,
    pub create_namespace: bool,
    pub depends_on: Vec<String>,
    pub values: serde_json::Value,
    pub patches: Vec<PatchSpec>,
    pub verify: VerifySpec,
}

impl ChartAddon {
    pub fn new(name: impl Into<String>, chart: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enabled: true,
            chart: chart.into(),
            namespace: namespace.into(),
            create_namespace: false,
            depends_on: Vec::new(),
            values: serde_json::Value::Null,
            patches: Vec::new(),
            verify: VerifySpec::default(),
        }
    }

    /// Run every configured patch over the rendered stream, in order
    fn apply_patches(&self, rendered: String) -> Result<String> {
        self.patches.iter().try_fold(rendered, |manifests, spec| {
            let patch = spec.to_patch();
            debug!("Applying patch: {}", patch.description());
            patch.apply(&manifests)
        })
    }

    async fn wait_for<F, Fut>(&self, ctx: &InstallContext, what: String, check: F) -> Result<()>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<bool>>,
    {
        if wait_until(&what, ctx.verify_timeout, &ctx.cancel, check).await? {
            Ok(())
        } else {
            Err(OutfitterError::VerifyTimeout {
                addon: self.name.clone(),
                what,
            })
        }
    }
}

#[async_trait]
impl AddonUnit for ChartAddon {
    fn name(&self) -> &str {
        &self.name
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    fn namespace(&self) -> Option<&str> {
        Some(&self.namespace)
    }

    fn dependencies(&self) -> Vec<String> {
        self.depends_on.clone()
    }

    #[instrument(skip(self, ctx), fields(addon = %self.name))]
    async fn generate_manifests(&self, ctx: &InstallContext) -> Result<Vec<String>> {
        let rendered = ctx
            .renderer
            .render(&self.chart, &self.namespace, &self.values)
            .await?;
        let patched = self.apply_patches(rendered)?;

        let mut manifests = Vec::with_capacity(2);
        if self.create_namespace {
            manifests.push(namespace_manifest(&self.namespace));
        }
        manifests.push(patched);
        Ok(manifests)
    }

    #[instrument(skip(self, ctx, client), fields(addon = %self.name))]
    async fn verify(&self, ctx: &InstallContext, client: &dyn ClusterClient) -> Result<()> {
        for (group, kind) in &self.verify.crds {
            self.wait_for(ctx, format!("CRD {}/{}", group, kind), move || {
                client.crd_available(group, kind)
            })
            .await?;
        }

        for workload in &self.verify.workloads {
            let namespace = workload.namespace.as_deref().unwrap_or(&self.namespace);
            self.wait_for(
                ctx,
                format!("{}/{}/{}", workload.kind, namespace, workload.name),
                move || client.workload_ready(&workload.kind, namespace, &workload.name),
            )
            .await?;
        }

        if self.verify.secret_probe {
            info!("Probing secret writes in namespace {}", self.namespace);
            // Clear a probe left behind by an interrupted run
            client
                .delete_secret(&self.namespace, PROBE_SECRET_NAME)
                .await?;
            client
                .create_secret(
                    &self.namespace,
                    PROBE_SECRET_NAME,
                    BTreeMap::from([("probe".to_string(), self.name.clone())]),
                )
                .await?;
            client
                .delete_secret(&self.namespace, PROBE_SECRET_NAME)
                .await?;
        }

        Ok(())
    }
}
