// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Defaults for the well-known addons.
//!
//! Configuration only needs to name one of these and enable it; anything it
//! sets explicitly overrides the defaults below.

/// Built-in defaults for a named addon
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub chart: &'static str,
    pub namespace: &'static str,
    pub depends_on: &'static [&'static str],
}

pub const CILIUM: &str = "cilium";
pub const CERT_MANAGER: &str = "cert-manager";
pub const INGRESS_NGINX: &str = "ingress-nginx";
pub const LOCAL_PATH_PROVISIONER: &str = "local-path-provisioner";
pub const KUBE_PROMETHEUS_STACK: &str = "kube-prometheus-stack";
pub const ARGO_CD: &str = "argo-cd";

pub fn lookup(name: &str) -> Option<CatalogEntry> {
    let entry = match name {
        // networking
        CILIUM => CatalogEntry {
            chart: "cilium",
            namespace: "kube-system",
            depends_on: &[],
        },
        // certificates
        CERT_MANAGER => CatalogEntry {
            chart: "cert-manager",
            namespace: "cert-manager",
            depends_on: &[CILIUM],
        },
        // ingress
        INGRESS_NGINX => CatalogEntry {
            chart: "ingress-nginx",
            namespace: "ingress-nginx",
            depends_on: &[CILIUM],
        },
        // storage
        LOCAL_PATH_PROVISIONER => CatalogEntry {
            chart: "local-path-provisioner",
            namespace: "local-path-storage",
            depends_on: &[CILIUM],
        },
        // monitoring
        KUBE_PROMETHEUS_STACK => CatalogEntry {
            chart: "kube-prometheus-stack",
            namespace: "monitoring",
            depends_on: &[CERT_MANAGER],
        },
        // gitops
        ARGO_CD => CatalogEntry {
            chart: "argo-cd",
            namespace: "argocd",
            depends_on: &[INGRESS_NGINX, CERT_MANAGER],
        },
        _ => return None,
    };
    Some(entry)
}
