// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Dependency-ordered installation planning.
//!
//! Kahn's algorithm over the enabled units, taking the lexicographically
//! smallest ready unit at every step so the order is stable across runs no
//! matter how the input was ordered.

use crate::addons::AddonUnit;
use crate::error::{OutfitterError, Result};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// Units in an order where every dependency precedes its dependents
pub struct ExecutionOrder {
    units: Vec<Box<dyn AddonUnit>>,
}

impl ExecutionOrder {
    pub fn names(&self) -> Vec<String> {
        self.units.iter().map(|u| u.name().to_string()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

impl IntoIterator for ExecutionOrder {
    type Item = Box<dyn AddonUnit>;
    type IntoIter = std::vec::IntoIter<Box<dyn AddonUnit>>;

    fn into_iter(self) -> Self::IntoIter {
        self.units.into_iter()
    }
}

/// Compute the installation order of the enabled units.
///
/// Disabled units are dropped. A dependency on a unit that is not enabled is
/// logged and ignored. Fails with [`OutfitterError::DependencyCycle`] naming
/// every unit that could not be ordered.
pub fn resolve(units: Vec<Box<dyn AddonUnit>>) -> Result<ExecutionOrder> {
    let mut by_name: BTreeMap<String, Box<dyn AddonUnit>> = BTreeMap::new();
    for unit in units {
        if !unit.enabled() {
            debug!("Skipping disabled addon {}", unit.name());
            continue;
        }
        let name = unit.name().to_string();
        if by_name.contains_key(&name) {
            return Err(OutfitterError::DuplicateAddon(name));
        }
        by_name.insert(name, unit);
    }

    let mut pending: BTreeMap<&str, usize> = by_name.keys().map(|n| (n.as_str(), 0)).collect();
    let mut dependents: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();

    let dependencies: Vec<(&str, Vec<String>)> = by_name
        .iter()
        .map(|(name, unit)| (name.as_str(), unit.dependencies()))
        .collect();

    for (name, deps) in &dependencies {
        let name = *name;
        for dep in deps {
            let Some((dep, _)) = by_name.get_key_value(dep.as_str()) else {
                warn!(
                    "Addon {} depends on {}, which is not enabled; ignoring dependency",
                    name, dep
                );
                continue;
            };
            // Repeated declarations of the same dependency count once
            if dependents.entry(dep.as_str()).or_default().insert(name) {
                *pending.entry(name).or_default() += 1;
            }
        }
    }

    let mut ready: BTreeSet<&str> = pending
        .iter()
        .filter(|(_, count)| **count == 0)
        .map(|(name, _)| *name)
        .collect();
    let mut ordered: Vec<String> = Vec::with_capacity(by_name.len());

    while let Some(name) = ready.pop_first() {
        ordered.push(name.to_string());
        for dependent in dependents.get(name).into_iter().flatten() {
            if let Some(count) = pending.get_mut(dependent) {
                *count -= 1;
                if *count == 0 {
                    ready.insert(*dependent);
                }
            }
        }
    }

    if ordered.len() < by_name.len() {
        let unresolved: Vec<String> = pending
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(name, _)| name.to_string())
            .collect();
        return Err(OutfitterError::DependencyCycle(unresolved));
    }

    debug!("Resolved installation order: {}", ordered.join(" -> "));

    let units = ordered
        .iter()
        .filter_map(|name| by_name.remove(name))
        .collect();
    Ok(ExecutionOrder { units })
}
