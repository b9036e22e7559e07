// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Chart rendering collaborators.
//!
//! Rendering itself is delegated: a [`ChartRenderer`] turns a chart, a
//! namespace and a value tree into a manifest stream, and chart sources are
//! looked up through an [`AssetBundle`].

pub mod helm;

use crate::error::{OutfitterError, Result};
use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};

pub use helm::HelmRenderer;

#[async_trait]
pub trait ChartRenderer: Send + Sync {
    /// Render `chart` for installation into `namespace`.
    ///
    /// Identical inputs are expected to produce identical output.
    async fn render(&self, chart: &str, namespace: &str, values: &serde_json::Value)
        -> Result<String>;
}

/// Named read-only assets resolvable by relative path
pub trait AssetBundle: Send + Sync {
    fn resolve(&self, path: &str) -> Result<PathBuf>;
}

/// An [`AssetBundle`] rooted at a directory on disk
#[derive(Debug, Clone)]
pub struct DirectoryBundle {
    root: PathBuf,
}

impl DirectoryBundle {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetBundle for DirectoryBundle {
    fn resolve(&self, path: &str) -> Result<PathBuf> {
        let relative = Path::new(path);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if path.is_empty() || escapes {
            return Err(OutfitterError::AssetNotFound(path.to_string()));
        }

        let resolved = self.root.join(relative);
        if !resolved.exists() {
            return Err(OutfitterError::AssetNotFound(path.to_string()));
        }
        Ok(resolved)
    }
}
