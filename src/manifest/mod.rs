// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Generic manifest document model and the patch engine built on it.

pub mod document;
pub mod patch;
pub mod patchers;
pub mod stream;
pub mod value;

pub use document::Document;
pub use patch::{patch, ManifestPatch};
pub use patchers::{dns_policy_patch, host_network_api_patch, host_network_api_patch_with};
pub use value::{Map, Value};
