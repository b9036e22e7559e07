// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes utilities for applying manifests, discovery, and health checks.

pub mod apply;
pub mod client;
pub mod crd;
pub mod namespaces;
pub mod wait;
pub mod workloads;

pub use client::{ClusterClient, KubeClusterClient};
pub use namespaces::{ensure_namespace_exists, namespace_manifest};
pub use wait::wait_until;
