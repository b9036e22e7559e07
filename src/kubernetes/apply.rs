// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Server-side apply of arbitrary manifest streams

use crate::constants::FIELD_MANAGER;
use crate::error::{OutfitterError, Result};
use crate::manifest::{stream, Document};
use kube::{
    api::{DynamicObject, GroupVersionKind, Patch, PatchParams},
    discovery::{pinned_kind, Scope},
    Api, Client,
};
use tracing::{debug, instrument};

/// Split an apiVersion into (group, version); the core group is empty
pub fn parse_api_version(api_version: &str) -> (&str, &str) {
    match api_version.split_once('/') {
        Some((group, version)) => (group, version),
        None => ("", api_version),
    }
}

/// Apply every document of a manifest stream, in order, with server-side apply.
///
/// Namespaced objects that do not set a namespace go to `default_namespace`,
/// or to the client's default namespace when none is given. Returns the
/// number of objects applied.
#[instrument(skip(client, manifests))]
pub async fn apply_manifests(
    client: &Client,
    manifests: &str,
    default_namespace: Option<&str>,
) -> Result<usize> {
    let documents = stream::decode(manifests)?;
    for document in &documents {
        apply_document(client, document, default_namespace).await?;
    }
    Ok(documents.len())
}

async fn apply_document(
    client: &Client,
    document: &Document,
    default_namespace: Option<&str>,
) -> Result<()> {
    let resource = document.to_string();
    let apply_error = |message: String| OutfitterError::Apply {
        resource: resource.clone(),
        message,
    };

    if document.kind().is_empty() || document.api_version().is_empty() {
        return Err(apply_error("missing apiVersion or kind".to_string()));
    }
    if document.name().is_empty() {
        return Err(apply_error("missing metadata.name".to_string()));
    }

    let (group, version) = parse_api_version(document.api_version());
    let gvk = GroupVersionKind::gvk(group, version, document.kind());
    let (api_resource, capabilities) = pinned_kind(client, &gvk)
        .await
        .map_err(|e| apply_error(format!("unable to resolve resource type: {}", e)))?;

    let api: Api<DynamicObject> = match capabilities.scope {
        Scope::Namespaced => {
            let namespace = match document.namespace() {
                "" => default_namespace.unwrap_or_else(|| client.default_namespace()),
                ns => ns,
            };
            Api::namespaced_with(client.clone(), namespace, &api_resource)
        }
        Scope::Cluster => Api::all_with(client.clone(), &api_resource),
    };

    let pp = PatchParams::apply(FIELD_MANAGER).force();
    api.patch(document.name(), &pp, &Patch::Apply(document))
        .await
        .map_err(|e| apply_error(e.to_string()))?;

    debug!("Applied {}", resource);
    Ok(())
}
