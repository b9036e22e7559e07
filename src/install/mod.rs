// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

pub mod driver;
pub mod resolver;

pub use driver::{InstallOptions, InstallReport, Installer, RunState};
pub use resolver::{resolve, ExecutionOrder};
