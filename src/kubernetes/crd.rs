// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! CRD availability checking utilities

use crate::error::Result;
use kube::{discovery::Discovery, Client};
use tracing::debug;

/// Check if a custom resource kind is served by the API server in any version
/// of `group`.
pub async fn crd_available(client: &Client, group: &str, kind: &str) -> Result<bool> {
    let discovery = Discovery::new(client.clone())
        .filter(&[group])
        .run()
        .await?;

    for api_group in discovery.groups() {
        if api_group.name() != group {
            continue;
        }
        for (ar, _) in api_group.recommended_resources() {
            if ar.kind == kind {
                debug!("Found {}/{} in version {}", group, kind, ar.version);
                return Ok(true);
            }
        }
    }

    Ok(false)
}
