// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Predicate-guarded mutation of rendered manifest streams.
//!
//! Charts are consumed as rendered output, so corrections are expressed as
//! "find the objects matching a predicate, then mutate a known sub-path".
//! A patch whose target is absent from the stream is an error: it means the
//! chart changed upstream or the caller points at the wrong resource.

use crate::error::{OutfitterError, Result};
use crate::manifest::document::Document;
use crate::manifest::stream;
use std::fmt;
use tracing::debug;

type Matcher<'a> = Box<dyn Fn(&Document) -> bool + Send + Sync + 'a>;
type Mutator<'a> = Box<dyn Fn(&mut Document) -> Result<()> + Send + Sync + 'a>;

/// A described (match, mutate) pair that can be applied to a manifest stream.
pub struct ManifestPatch<'a> {
    description: String,
    matches: Matcher<'a>,
    mutate: Mutator<'a>,
}

impl<'a> ManifestPatch<'a> {
    pub fn new(
        description: impl Into<String>,
        matches: impl Fn(&Document) -> bool + Send + Sync + 'a,
        mutate: impl Fn(&mut Document) -> Result<()> + Send + Sync + 'a,
    ) -> Self {
        Self {
            description: description.into(),
            matches: Box::new(matches),
            mutate: Box::new(mutate),
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn apply(&self, manifests: &str) -> Result<String> {
        patch(manifests, &self.description, &self.matches, &self.mutate)
    }
}

impl fmt::Debug for ManifestPatch<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManifestPatch")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Apply `mutate` to every document for which `matches` holds and return the
/// re-encoded stream. All documents are kept, in their original order.
///
/// Errors from `mutate` are returned unchanged and no output is produced.
/// If no document matches, fails with [`OutfitterError::NoMatchingDocument`].
pub fn patch<M, F>(manifests: &str, description: &str, matches: M, mut mutate: F) -> Result<String>
where
    M: Fn(&Document) -> bool,
    F: FnMut(&mut Document) -> Result<()>,
{
    let mut documents = stream::decode(manifests)?;

    let mut applied = 0usize;
    for document in documents.iter_mut() {
        if matches(&*document) {
            mutate(document)?;
            applied += 1;
            debug!(patch = %description, resource = %document, "Patched manifest document");
        }
    }

    if applied == 0 {
        return Err(OutfitterError::NoMatchingDocument {
            description: description.to_string(),
        });
    }

    debug!(
        patch = %description,
        applied,
        total = documents.len(),
        "Patch applied"
    );

    stream::encode(&documents)
}
