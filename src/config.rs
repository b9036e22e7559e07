// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::addons::catalog;
use crate::addons::{ChartAddon, PatchSpec, VerifySpec, WorkloadRef};
use crate::constants::{api_access, verify};
use anyhow::{bail, Context, Result};
use indexmap::IndexMap;
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Installer configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the cluster addon configuration file
    pub config_path: PathBuf,
    /// Directory holding the local chart sources
    pub charts_dir: PathBuf,
    pub helm_binary: String,
    pub continue_on_error: bool,
    pub verify: bool,
    pub verify_timeout: Duration,
    /// Explicit kubeconfig; the default inference chain is used when unset
    pub kubeconfig: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let config_path = lookup("OUTFITTER_CONFIG")
            .map(PathBuf::from)
            .context("OUTFITTER_CONFIG environment variable not set")?;
        let charts_dir = lookup("OUTFITTER_CHARTS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./charts"));
        let helm_binary = lookup("OUTFITTER_HELM_BINARY").unwrap_or_else(|| "helm".to_string());

        let continue_on_error = parse_or(&lookup, "OUTFITTER_CONTINUE_ON_ERROR", false)?;
        let verify = parse_or(&lookup, "OUTFITTER_VERIFY", true)?;
        let verify_timeout = Duration::from_secs(parse_or(
            &lookup,
            "OUTFITTER_VERIFY_TIMEOUT_SECS",
            verify::DEFAULT_TIMEOUT_SECS,
        )?);
        let kubeconfig = lookup("OUTFITTER_KUBECONFIG").map(PathBuf::from);

        Ok(Config {
            config_path,
            charts_dir,
            helm_binary,
            continue_on_error,
            verify,
            verify_timeout,
            kubeconfig,
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid value '{}' for {}", raw, key)),
        None => Ok(default),
    }
}

/// The addons to install into a cluster, keyed by addon name
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClusterConfig {
    #[serde(default)]
    pub addons: IndexMap<String, AddonConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AddonConfig {
    pub enabled: bool,
    pub chart: Option<String>,
    pub namespace: Option<String>,
    pub create_namespace: bool,
    /// Replaces the built-in dependencies when set
    pub depends_on: Option<Vec<String>>,
    /// Addons with an order are installed after every enabled addon with a
    /// lower order
    pub order: Option<i64>,
    pub values: serde_json::Value,
    pub patches: Vec<PatchConfig>,
    pub verify: VerifyConfig,
}

impl Default for AddonConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            chart: None,
            namespace: None,
            create_namespace: false,
            depends_on: None,
            order: None,
            values: serde_json::Value::Null,
            patches: Vec::new(),
            verify: VerifyConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PatchConfig {
    DnsPolicy {
        target: String,
        #[serde(default = "default_dns_policy")]
        policy: String,
    },
    HostNetworkApi {
        target: String,
        #[serde(default = "default_api_host")]
        host: String,
        #[serde(default = "default_api_port")]
        port: String,
    },
}

fn default_dns_policy() -> String {
    "Default".to_string()
}

fn default_api_host() -> String {
    api_access::DEFAULT_HOST.to_string()
}

fn default_api_port() -> String {
    api_access::DEFAULT_PORT.to_string()
}

impl From<PatchConfig> for PatchSpec {
    fn from(config: PatchConfig) -> Self {
        match config {
            PatchConfig::DnsPolicy { target, policy } => PatchSpec::DnsPolicy { target, policy },
            PatchConfig::HostNetworkApi { target, host, port } => {
                PatchSpec::HostNetworkApi { target, host, port }
            }
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VerifyConfig {
    pub workloads: Vec<WorkloadConfig>,
    pub crds: Vec<CrdConfig>,
    pub secret_probe: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkloadConfig {
    pub kind: String,
    pub name: String,
    #[serde(default)]
    pub namespace: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CrdConfig {
    pub group: String,
    pub kind: String,
}

impl From<VerifyConfig> for VerifySpec {
    fn from(config: VerifyConfig) -> Self {
        VerifySpec {
            crds: config
                .crds
                .into_iter()
                .map(|crd| (crd.group, crd.kind))
                .collect(),
            workloads: config
                .workloads
                .into_iter()
                .map(|w| WorkloadRef {
                    kind: w.kind,
                    name: w.name,
                    namespace: w.namespace,
                })
                .collect(),
            secret_probe: config.secret_probe,
        }
    }
}

impl ClusterConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read cluster config {}", path.display()))?;
        serde_yaml::from_str(&raw)
            .with_context(|| format!("Failed to parse cluster config {}", path.display()))
    }

    /// Build one [`ChartAddon`] per configured addon.
    ///
    /// Built-in addons take their chart, namespace and dependencies from the
    /// catalog unless the configuration sets them. An `order` becomes a
    /// dependency on every enabled addon with a strictly lower order.
    pub fn into_units(self) -> Result<Vec<ChartAddon>> {
        let ordered: Vec<(String, i64)> = self
            .addons
            .iter()
            .filter(|(_, addon)| addon.enabled)
            .filter_map(|(name, addon)| addon.order.map(|order| (name.clone(), order)))
            .collect();

        let mut units = Vec::with_capacity(self.addons.len());
        for (name, addon) in self.addons {
            let entry = catalog::lookup(&name);

            let Some(chart) = addon.chart.or_else(|| entry.as_ref().map(|e| e.chart.to_string()))
            else {
                bail!("Addon {} is not built in and has no chart configured", name);
            };
            let Some(namespace) = addon
                .namespace
                .or_else(|| entry.as_ref().map(|e| e.namespace.to_string()))
            else {
                bail!("Addon {} is not built in and has no namespace configured", name);
            };

            let mut depends_on = addon.depends_on.unwrap_or_else(|| {
                entry
                    .as_ref()
                    .map(|e| e.depends_on.iter().map(|d| d.to_string()).collect())
                    .unwrap_or_default()
            });
            if let Some(order) = addon.order {
                for (other, other_order) in &ordered {
                    if *other_order < order && !depends_on.contains(other) {
                        debug!("Addon {} ordered after {}", name, other);
                        depends_on.push(other.clone());
                    }
                }
            }

            let mut unit = ChartAddon::new(name, chart, namespace);
            unit.enabled = addon.enabled;
            unit.create_namespace = addon.create_namespace;
            unit.depends_on = depends_on;
            unit.values = addon.values;
            unit.patches = addon.patches.into_iter().map(PatchSpec::from).collect();
            unit.verify = addon.verify.into();
            units.push(unit);
        }
        Ok(units)
    }
}
