// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Ready-made patches for workarounds needed by rendered charts.

use crate::constants::api_access;
use crate::error::{OutfitterError, Result};
use crate::manifest::document::Document;
use crate::manifest::patch::ManifestPatch;
use crate::manifest::value::{Map, Value};

const POD_SPEC: [&str; 3] = ["spec", "template", "spec"];

/// Override `spec.template.spec.dnsPolicy` on the Deployment named `target`.
pub fn dns_policy_patch<'a>(target: &'a str, policy: &'a str) -> ManifestPatch<'a> {
    ManifestPatch::new(
        format!("set dnsPolicy={policy} on Deployment/{target}"),
        move |doc: &Document| doc.is(&["Deployment"], target),
        move |doc: &mut Document| {
            let mut path = POD_SPEC.to_vec();
            path.push("dnsPolicy");
            doc.root_mut().set_path(&path, Value::from(policy))
        },
    )
}

/// Point every container of the host-networked DaemonSet or Deployment named
/// `target` at a directly reachable API server, using the default endpoint.
pub fn host_network_api_patch(target: &str) -> ManifestPatch<'_> {
    host_network_api_patch_with(
        target,
        api_access::DEFAULT_HOST,
        api_access::DEFAULT_PORT,
    )
}

pub fn host_network_api_patch_with<'a>(
    target: &'a str,
    host: &'a str,
    port: &'a str,
) -> ManifestPatch<'a> {
    ManifestPatch::new(
        format!("inject API server address into DaemonSet|Deployment/{target}"),
        move |doc: &Document| doc.is(&["DaemonSet", "Deployment"], target),
        move |doc: &mut Document| inject_api_server_env(doc, host, port),
    )
}

/// Rewrite the env of every container so that the API server variables are
/// present exactly once with the given values.
///
/// Existing entries for the same names are dropped first; some charts define
/// them already and duplicate keys resolve unpredictably.
fn inject_api_server_env(doc: &mut Document, host: &str, port: &str) -> Result<()> {
    let resource = doc.to_string();
    let invalid = |reason: &str| OutfitterError::InvalidManifest {
        resource: resource.clone(),
        reason: reason.to_string(),
    };

    let mut path = POD_SPEC.to_vec();
    path.push("containers");
    let containers = doc
        .root_mut()
        .get_path_mut(&path)
        .and_then(Value::as_array_mut)
        .filter(|c| !c.is_empty())
        .ok_or_else(|| invalid("no containers in spec.template.spec.containers"))?;

    for container in containers.iter_mut() {
        let container = container
            .as_map_mut()
            .ok_or_else(|| invalid("container entry is not a map"))?;

        let env = container.entry("env".to_string()).or_insert(Value::Null);
        if env.is_null() {
            *env = Value::Array(Vec::new());
        }
        let env = env
            .as_array_mut()
            .ok_or_else(|| invalid("container env is not a list"))?;

        env.retain(|entry| {
            !matches!(
                entry.get("name").and_then(Value::as_str),
                Some(api_access::HOST_ENV | api_access::PORT_ENV)
            )
        });
        env.push(env_var(api_access::HOST_ENV, host));
        env.push(env_var(api_access::PORT_ENV, port));
    }

    Ok(())
}

fn env_var(name: &str, value: &str) -> Value {
    let mut entry = Map::new();
    entry.insert("name".to_string(), Value::from(name));
    entry.insert("value".to_string(), Value::from(value));
    Value::from(entry)
}
