// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::manifest::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single Kubernetes object from a rendered manifest stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(Value);

impl Document {
    pub fn new(root: Value) -> Self {
        Self(root)
    }

    pub fn kind(&self) -> &str {
        self.str_at(&["kind"])
    }

    pub fn api_version(&self) -> &str {
        self.str_at(&["apiVersion"])
    }

    pub fn name(&self) -> &str {
        self.str_at(&["metadata", "name"])
    }

    /// Namespace of the object, empty when the manifest does not set one
    pub fn namespace(&self) -> &str {
        self.str_at(&["metadata", "namespace"])
    }

    /// Whether this document is one of `kinds` and carries the given name
    pub fn is(&self, kinds: &[&str], name: &str) -> bool {
        kinds.contains(&self.kind()) && self.name() == name
    }

    pub fn root(&self) -> &Value {
        &self.0
    }

    pub fn root_mut(&mut self) -> &mut Value {
        &mut self.0
    }

    fn str_at(&self, path: &[&str]) -> &str {
        self.0
            .get_path(path)
            .and_then(Value::as_str)
            .unwrap_or_default()
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace().is_empty() {
            write!(f, "{}/{}", self.kind(), self.name())
        } else {
            write!(f, "{}/{}/{}", self.kind(), self.namespace(), self.name())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_document(yaml: &str) -> Document {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_accessors() {
        let doc = make_document(
            "apiVersion: apps/v1\nkind: Deployment\nmetadata:\n  name: coredns\n  namespace: kube-system\n",
        );
        assert_eq!(doc.api_version(), "apps/v1");
        assert_eq!(doc.kind(), "Deployment");
        assert_eq!(doc.name(), "coredns");
        assert_eq!(doc.namespace(), "kube-system");
        assert_eq!(doc.to_string(), "Deployment/kube-system/coredns");
    }

    #[test]
    fn test_missing_namespace_is_empty() {
        let doc = make_document("kind: ClusterRole\nmetadata:\n  name: reader\n");
        assert_eq!(doc.namespace(), "");
        assert_eq!(doc.to_string(), "ClusterRole/reader");
    }

    #[test]
    fn test_non_string_kind_is_empty() {
        let doc = make_document("kind: 3\nmetadata: []\n");
        assert_eq!(doc.kind(), "");
        assert_eq!(doc.name(), "");
    }

    #[test]
    fn test_is_requires_kind_and_name() {
        let doc = make_document("kind: Service\nmetadata:\n  name: web\n");
        assert!(doc.is(&["Service"], "web"));
        assert!(!doc.is(&["Deployment"], "web"));
        assert!(!doc.is(&["Service"], "api"));
    }
}
