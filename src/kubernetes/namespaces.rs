// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Namespace management utilities

use crate::error::{OutfitterError, Result};
use k8s_openapi::api::core::v1::Namespace;
use kube::{
    api::{ObjectMeta, PostParams},
    Api, Client,
};
use tracing::{debug, info, instrument};

/// Ensure a namespace exists in the cluster, create if it doesn't
#[instrument(skip(client))]
pub async fn ensure_namespace_exists(client: &Client, namespace: &str) -> Result<()> {
    let namespaces: Api<Namespace> = Api::all(client.clone());

    match namespaces.get_opt(namespace).await {
        Ok(Some(_)) => {
            debug!("Namespace {} already exists", namespace);
            Ok(())
        }
        Ok(None) => {
            info!("Creating namespace {}", namespace);
            namespaces
                .create(&PostParams::default(), &namespace_object(namespace))
                .await?;
            Ok(())
        }
        Err(e) => Err(OutfitterError::Apply {
            resource: format!("Namespace/{}", namespace),
            message: e.to_string(),
        }),
    }
}

/// Manifest for a bare namespace, used by addons that own their namespace
pub fn namespace_manifest(namespace: &str) -> String {
    format!("apiVersion: v1\nkind: Namespace\nmetadata:\n  name: {}\n", namespace)
}

fn namespace_object(namespace: &str) -> Namespace {
    Namespace {
        metadata: ObjectMeta {
            name: Some(namespace.to_string()),
            ..Default::default()
        },
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::stream;
    use crate::test_utils::{namespace_json, MockService};

    #[tokio::test]
    async fn test_existing_namespace_is_not_created() {
        let mock = MockService::new().on_get(
            "/api/v1/namespaces/monitoring",
            200,
            &namespace_json("monitoring"),
        );
        let client = mock.clone().into_client();

        ensure_namespace_exists(&client, "monitoring").await.unwrap();

        assert_eq!(
            mock.requests(),
            vec![("GET".to_string(), "/api/v1/namespaces/monitoring".to_string())]
        );
    }

    #[tokio::test]
    async fn test_missing_namespace_is_created() {
        let mock = MockService::new().on_post(
            "/api/v1/namespaces",
            201,
            &namespace_json("argocd"),
        );
        let client = mock.clone().into_client();

        ensure_namespace_exists(&client, "argocd").await.unwrap();

        assert!(mock
            .requests()
            .contains(&("POST".to_string(), "/api/v1/namespaces".to_string())));
    }

    #[test]
    fn test_namespace_manifest_decodes() {
        let docs = stream::decode(&namespace_manifest("cert-manager")).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].kind(), "Namespace");
        assert_eq!(docs[0].name(), "cert-manager");
    }
}
