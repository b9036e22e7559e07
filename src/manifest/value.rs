// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Schema-less value tree for rendered manifests.
//!
//! Maps keep insertion order so untouched documents re-serialize with their
//! original key layout.

use crate::error::{OutfitterError, Result};
use indexmap::IndexMap;
use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::fmt;

pub type Map = IndexMap<String, Value>;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    String(String),
    Array(Vec<Value>),
    Map(Map),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_map_mut(&mut self) -> Option<&mut Map> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Look up a key on a map value
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map().and_then(|m| m.get(key))
    }

    /// Follow a sequence of map keys
    pub fn get_path(&self, path: &[&str]) -> Option<&Value> {
        path.iter().try_fold(self, |current, key| current.get(key))
    }

    pub fn get_path_mut(&mut self, path: &[&str]) -> Option<&mut Value> {
        path.iter()
            .try_fold(self, |current, key| current.as_map_mut()?.get_mut(*key))
    }

    /// Set the value at `path`, creating intermediate maps where they are
    /// missing or null. Fails if an intermediate segment holds a non-map value.
    pub fn set_path(&mut self, path: &[&str], value: Value) -> Result<()> {
        let Some((last, parents)) = path.split_last() else {
            *self = value;
            return Ok(());
        };

        let mut current = self;
        for (depth, key) in parents.iter().enumerate() {
            current = current
                .ensure_map(&path[..depth])?
                .entry(key.to_string())
                .or_insert(Value::Null);
        }

        current
            .ensure_map(parents)?
            .insert(last.to_string(), value);
        Ok(())
    }

    fn ensure_map(&mut self, at: &[&str]) -> Result<&mut Map> {
        if self.is_null() {
            *self = Value::Map(Map::new());
        }
        match self {
            Value::Map(map) => Ok(map),
            _ if at.is_empty() => Err(OutfitterError::PathConflict {
                path: "<root>".to_string(),
            }),
            _ => Err(OutfitterError::PathConflict {
                path: at.join("."),
            }),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Map(map)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::UInt(u) => serializer.serialize_u64(*u),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Map(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map {
                    out.serialize_entry(k, v)?;
                }
                out.end()
            }
        }
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a YAML or JSON value")
    }

    fn visit_bool<E>(self, v: bool) -> std::result::Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E>(self, v: i64) -> std::result::Result<Value, E> {
        Ok(Value::Int(v))
    }

    fn visit_u64<E>(self, v: u64) -> std::result::Result<Value, E> {
        Ok(i64::try_from(v).map_or(Value::UInt(v), Value::Int))
    }

    fn visit_f64<E>(self, v: f64) -> std::result::Result<Value, E> {
        Ok(Value::Float(v))
    }

    fn visit_str<E>(self, v: &str) -> std::result::Result<Value, E> {
        Ok(Value::String(v.to_string()))
    }

    fn visit_string<E>(self, v: String) -> std::result::Result<Value, E> {
        Ok(Value::String(v))
    }

    fn visit_unit<E>(self) -> std::result::Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E>(self) -> std::result::Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, d: D) -> std::result::Result<Value, D::Error> {
        Value::deserialize(d)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<Value, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Value::Array(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<Value, A::Error> {
        let mut map = Map::with_capacity(access.size_hint().unwrap_or(0));
        while let Some(key) = access.next_key::<Value>()? {
            // YAML allows scalar keys such as `80:` or `true:`; Kubernetes
            // treats them all as strings.
            let key = match key {
                Value::String(s) => s,
                Value::Int(i) => i.to_string(),
                Value::UInt(u) => u.to_string(),
                Value::Float(f) => f.to_string(),
                Value::Bool(b) => b.to_string(),
                Value::Null => "null".to_string(),
                Value::Array(_) | Value::Map(_) => {
                    return Err(de::Error::custom("unsupported non-scalar map key"))
                }
            };
            let value = access.next_value()?;
            map.insert(key, value);
        }
        Ok(Value::Map(map))
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> Value {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_deserialize_preserves_key_order() {
        let value = parse("zeta: 1\nalpha: 2\nmid: 3\n");
        let keys: Vec<&str> = value.as_map().unwrap().keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_deserialize_scalars() {
        let value = parse("a: true\nb: -3\nc: 1.5\nd: text\ne: null\nf: '6443'\n");
        assert_eq!(value.get("a"), Some(&Value::Bool(true)));
        assert_eq!(value.get("b"), Some(&Value::Int(-3)));
        assert_eq!(value.get("c"), Some(&Value::Float(1.5)));
        assert_eq!(value.get("d"), Some(&Value::from("text")));
        assert_eq!(value.get("e"), Some(&Value::Null));
        assert_eq!(value.get("f"), Some(&Value::from("6443")));
    }

    #[test]
    fn test_numeric_keys_become_strings() {
        let value = parse("data:\n  80: http\n");
        assert_eq!(value.get_path(&["data", "80"]), Some(&Value::from("http")));
    }

    #[test]
    fn test_json_input_is_accepted() {
        let value = parse(r#"{"kind": "ConfigMap", "data": {"k": "v"}}"#);
        assert_eq!(value.get("kind").and_then(Value::as_str), Some("ConfigMap"));
        assert_eq!(value.get_path(&["data", "k"]), Some(&Value::from("v")));
    }

    #[test]
    fn test_string_that_looks_numeric_stays_quoted() {
        let mut value = Value::Map(Map::new());
        value.set_path(&["port"], Value::from("6443")).unwrap();
        let out = serde_yaml::to_string(&value).unwrap();
        let back: Value = serde_yaml::from_str(&out).unwrap();
        assert_eq!(back.get("port"), Some(&Value::from("6443")));
    }

    #[test]
    fn test_get_path_missing() {
        let value = parse("spec:\n  replicas: 1\n");
        assert!(value.get_path(&["spec", "template", "spec"]).is_none());
        assert!(value.get_path(&["spec", "replicas", "deeper"]).is_none());
    }

    #[test]
    fn test_set_path_creates_intermediate_maps() {
        let mut value = parse("kind: Deployment\n");
        value
            .set_path(&["spec", "template", "spec", "dnsPolicy"], Value::from("Default"))
            .unwrap();
        assert_eq!(
            value.get_path(&["spec", "template", "spec", "dnsPolicy"]),
            Some(&Value::from("Default"))
        );
    }

    #[test]
    fn test_set_path_replaces_null_intermediate() {
        let mut value = parse("spec:\n  template: ~\n");
        value
            .set_path(&["spec", "template", "spec"], Value::from("x"))
            .unwrap();
        assert_eq!(
            value.get_path(&["spec", "template", "spec"]),
            Some(&Value::from("x"))
        );
    }

    #[test]
    fn test_set_path_overwrites_existing_leaf() {
        let mut value = parse("spec:\n  dnsPolicy: ClusterFirst\n  replicas: 2\n");
        value
            .set_path(&["spec", "dnsPolicy"], Value::from("Default"))
            .unwrap();
        assert_eq!(value.get_path(&["spec", "dnsPolicy"]), Some(&Value::from("Default")));
        assert_eq!(value.get_path(&["spec", "replicas"]), Some(&Value::Int(2)));
    }

    #[test]
    fn test_set_path_through_scalar_fails() {
        let mut value = parse("spec: scalar\n");
        let err = value
            .set_path(&["spec", "template"], Value::from("x"))
            .unwrap_err();
        assert!(matches!(err, OutfitterError::PathConflict { path } if path == "spec"));
    }

    #[test]
    fn test_set_path_on_scalar_root_names_root() {
        let mut value = Value::from("scalar");
        let err = value.set_path(&["metadata"], Value::Null).unwrap_err();
        assert!(matches!(err, OutfitterError::PathConflict { ref path } if path == "<root>"));
        assert!(err.to_string().contains("<root>"));
    }

    #[test]
    fn test_get_path_mut_allows_in_place_edit() {
        let mut value = parse("spec:\n  replicas: 1\n");
        *value.get_path_mut(&["spec", "replicas"]).unwrap() = Value::Int(3);
        assert_eq!(value.get_path(&["spec", "replicas"]), Some(&Value::Int(3)));
    }
}
