// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Cluster client abstraction and its kube-rs implementation

use crate::config::Config;
use crate::error::{OutfitterError, Result};
use crate::kubernetes::{apply, crd, namespaces, workloads};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;
use kube::{
    api::{DeleteParams, ObjectMeta, PostParams},
    config::{KubeConfigOptions, Kubeconfig},
    Api, Client,
};
use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

/// Operations the installer and addon verification need from a cluster.
///
/// `apply` must be idempotent: re-applying the same manifest updates the
/// existing objects in place.
#[async_trait]
pub trait ClusterClient: Send + Sync {
    /// Apply a (possibly multi-document) manifest stream. Namespaced objects
    /// without a namespace land in `default_namespace` when one is given.
    async fn apply(&self, manifest: &str, default_namespace: Option<&str>) -> Result<()>;

    async fn create_secret(
        &self,
        namespace: &str,
        name: &str,
        data: BTreeMap<String, String>,
    ) -> Result<()>;

    /// Delete a secret; a secret that does not exist is not an error
    async fn delete_secret(&self, namespace: &str, name: &str) -> Result<()>;

    async fn workload_ready(&self, kind: &str, namespace: &str, name: &str) -> Result<bool>;

    async fn crd_available(&self, group: &str, kind: &str) -> Result<bool>;
}

/// [`ClusterClient`] backed by the Kubernetes API
#[derive(Clone)]
pub struct KubeClusterClient {
    client: Client,
}

impl KubeClusterClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Connect using the configured kubeconfig, falling back to the default
    /// inference chain (KUBECONFIG, ~/.kube/config, in-cluster).
    pub async fn connect(config: &Config) -> Result<Self> {
        let client = match &config.kubeconfig {
            Some(path) => {
                info!("Loading kubeconfig from {}", path.display());
                let kubeconfig = tokio::fs::read_to_string(path).await?;
                create_client_from_kubeconfig(&kubeconfig).await?
            }
            None => Client::try_default().await?,
        };
        Ok(Self::new(client))
    }
}

#[async_trait]
impl ClusterClient for KubeClusterClient {
    async fn apply(&self, manifest: &str, default_namespace: Option<&str>) -> Result<()> {
        let applied = apply::apply_manifests(&self.client, manifest, default_namespace).await?;
        debug!("Applied {} objects", applied);
        Ok(())
    }

    #[instrument(skip(self, data))]
    async fn create_secret(
        &self,
        namespace: &str,
        name: &str,
        data: BTreeMap<String, String>,
    ) -> Result<()> {
        namespaces::ensure_namespace_exists(&self.client, namespace).await?;

        let secrets: Api<Secret> = Api::namespaced(self.client.clone(), namespace);
        let secret = Secret {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                namespace: Some(namespace.to_string()),
                ..Default::default()
            },
            string_data: Some(data),
            type_: Some("Opaque".to_string()),
            ..Default::default()
        };
        secrets.create(&PostParams::default(), &secret).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_secret(&self, namespace: &str, name: &str) -> Result<()> {
        let secrets: Api<Secret> = Api::namespaced(self.client.clone(), namespace);
        match secrets.delete(name, &DeleteParams::default()).await {
            Ok(_) => Ok(()),
            Err(kube::Error::Api(err)) if err.code == 404 => {
                debug!("Secret {}/{} already absent", namespace, name);
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn workload_ready(&self, kind: &str, namespace: &str, name: &str) -> Result<bool> {
        workloads::workload_ready(&self.client, kind, namespace, name).await
    }

    async fn crd_available(&self, group: &str, kind: &str) -> Result<bool> {
        crd::crd_available(&self.client, group, kind).await
    }
}

/// Create a Kubernetes client from a kubeconfig string
async fn create_client_from_kubeconfig(kubeconfig: &str) -> Result<Client> {
    let kubeconfig_parsed: Kubeconfig = serde_yaml::from_str(kubeconfig)
        .map_err(|e| OutfitterError::Config(format!("Failed to parse kubeconfig: {}", e)))?;

    let client_config =
        kube::Config::from_custom_kubeconfig(kubeconfig_parsed, &KubeConfigOptions::default())
            .await
            .map_err(|e| OutfitterError::Config(format!("Failed to create config: {}", e)))?;

    Client::try_from(client_config)
        .map_err(|e| OutfitterError::Config(format!("Failed to create client: {}", e)))
}
