// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OutfitterError {
    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("Circular dependency detected among addons: {}", .0.join(", "))]
    DependencyCycle(Vec<String>),

    #[error("Addon '{0}' is defined more than once")]
    DuplicateAddon(String),

    #[error("Failed to decode manifest document #{index}: {source}")]
    ManifestDecode {
        index: usize,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to encode manifest document: {0}")]
    ManifestEncode(#[source] serde_yaml::Error),

    #[error("Patch '{description}' matched no documents in the rendered manifests")]
    NoMatchingDocument { description: String },

    #[error("Invalid manifest for {resource}: {reason}")]
    InvalidManifest { resource: String, reason: String },

    #[error("Cannot write through non-map value at '{path}'")]
    PathConflict { path: String },

    #[error("Failed to render chart {chart}: {message}")]
    Render { chart: String, message: String },

    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    #[error("Failed to apply {resource}: {message}")]
    Apply { resource: String, message: String },

    #[error("Addon '{addon}' did not become healthy: timed out waiting for {what}")]
    VerifyTimeout { addon: String, what: String },

    #[error("Addon '{addon}' failed: {source}")]
    AddonFailed {
        addon: String,
        #[source]
        source: Box<OutfitterError>,
    },

    #[error("Installation cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, OutfitterError>;
