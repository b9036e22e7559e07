// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// The field manager name used for server-side apply
pub const FIELD_MANAGER: &str = "outfitter";

/// Environment variables injected into workloads that run with host networking
pub mod api_access {
    pub const HOST_ENV: &str = "KUBERNETES_SERVICE_HOST";
    pub const PORT_ENV: &str = "KUBERNETES_SERVICE_PORT";
    /// API endpoint reachable from the node's own network namespace
    pub const DEFAULT_HOST: &str = "localhost";
    pub const DEFAULT_PORT: &str = "6443";
}

/// Health polling configuration used by addon verification
pub mod verify {
    /// Initial polling interval in seconds
    pub const POLL_INTERVAL_SECS: u64 = 10;
    /// Maximum polling interval in seconds (exponential backoff cap)
    pub const POLL_MAX_INTERVAL_SECS: u64 = 60;
    /// Default overall verification deadline in seconds
    pub const DEFAULT_TIMEOUT_SECS: u64 = 600;
    /// Name of the throwaway secret written by the secret probe
    pub const PROBE_SECRET_NAME: &str = "outfitter-probe";
}

/// Manifest stream wire format
pub mod stream {
    pub const DOCUMENT_SEPARATOR: &str = "---";
}
