// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Readiness checks for the workload kinds charts typically ship

use crate::error::{OutfitterError, Result};
use k8s_openapi::api::apps::v1::{DaemonSet, Deployment, StatefulSet};
use kube::{Api, Client};
use tracing::debug;

/// Check whether the named workload has rolled out.
///
/// A workload that does not exist yet is reported as not ready.
pub async fn workload_ready(client: &Client, kind: &str, namespace: &str, name: &str) -> Result<bool> {
    let ready = match kind {
        "Deployment" => Api::<Deployment>::namespaced(client.clone(), namespace)
            .get_opt(name)
            .await?
            .is_some_and(|d| deployment_ready(&d)),
        "DaemonSet" => Api::<DaemonSet>::namespaced(client.clone(), namespace)
            .get_opt(name)
            .await?
            .is_some_and(|d| daemonset_ready(&d)),
        "StatefulSet" => Api::<StatefulSet>::namespaced(client.clone(), namespace)
            .get_opt(name)
            .await?
            .is_some_and(|s| statefulset_ready(&s)),
        other => {
            return Err(OutfitterError::Config(format!(
                "unsupported workload kind for readiness check: {}",
                other
            )))
        }
    };

    debug!("{}/{}/{} ready={}", kind, namespace, name, ready);
    Ok(ready)
}

fn deployment_ready(deployment: &Deployment) -> bool {
    let desired = deployment
        .spec
        .as_ref()
        .and_then(|s| s.replicas)
        .unwrap_or(1);
    deployment.status.as_ref().is_some_and(|s| {
        observed_current(deployment.metadata.generation, s.observed_generation)
            && s.updated_replicas.unwrap_or(0) >= desired
            && s.available_replicas.unwrap_or(0) >= desired
    })
}

fn daemonset_ready(daemonset: &DaemonSet) -> bool {
    daemonset.status.as_ref().is_some_and(|s| {
        observed_current(daemonset.metadata.generation, s.observed_generation)
            && s.updated_number_scheduled.unwrap_or(0) >= s.desired_number_scheduled
            && s.number_available.unwrap_or(0) >= s.desired_number_scheduled
    })
}

fn statefulset_ready(statefulset: &StatefulSet) -> bool {
    let desired = statefulset
        .spec
        .as_ref()
        .and_then(|s| s.replicas)
        .unwrap_or(1);
    statefulset.status.as_ref().is_some_and(|s| {
        observed_current(statefulset.metadata.generation, s.observed_generation)
            && s.ready_replicas.unwrap_or(0) >= desired
    })
}

fn observed_current(generation: Option<i64>, observed: Option<i64>) -> bool {
    match (generation, observed) {
        (Some(generation), Some(observed)) => observed >= generation,
        (Some(_), None) => false,
        (None, _) => true,
    }
}
