// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Chart rendering through `helm template`

use crate::error::{OutfitterError, Result};
use crate::render::{AssetBundle, ChartRenderer};
use async_trait::async_trait;
use std::process::Stdio;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, instrument};

/// Renders charts from an asset bundle by running `helm template`, with the
/// value tree passed on stdin.
pub struct HelmRenderer {
    binary: String,
    bundle: Arc<dyn AssetBundle>,
}

impl HelmRenderer {
    pub fn new(binary: impl Into<String>, bundle: Arc<dyn AssetBundle>) -> Self {
        Self {
            binary: binary.into(),
            bundle,
        }
    }

    /// Arguments for rendering the chart at `chart_path` as release `release`
    fn template_args(release: &str, chart_path: &str, namespace: &str) -> Vec<String> {
        [
            "template",
            release,
            chart_path,
            "--namespace",
            namespace,
            "--include-crds",
            "--values",
            "-",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }
}

#[async_trait]
impl ChartRenderer for HelmRenderer {
    #[instrument(skip(self, values))]
    async fn render(
        &self,
        chart: &str,
        namespace: &str,
        values: &serde_json::Value,
    ) -> Result<String> {
        let render_error = |message: String| OutfitterError::Render {
            chart: chart.to_string(),
            message,
        };

        let chart_path = self.bundle.resolve(chart)?;
        let values_yaml = match values {
            serde_json::Value::Null => String::new(),
            v => serde_yaml::to_string(v).map_err(|e| render_error(e.to_string()))?,
        };

        let release = chart.rsplit('/').next().unwrap_or(chart);
        let args = Self::template_args(release, &chart_path.to_string_lossy(), namespace);
        debug!("Running {} {}", self.binary, args.join(" "));

        let mut child = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(values_yaml.as_bytes()).await?;
        }

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(render_error(stderr.trim().to_string()));
        }

        String::from_utf8(output.stdout)
            .map_err(|e| render_error(format!("output is not UTF-8: {}", e)))
    }
}
