//! Sequential plugin chains.

use crate::config::{HostConfig, PluginSpec};
use crate::error::PluginHostError;
use crate::runner::invoke;
use protolock_types::{Data, Warning};
use tracing::info;

/// Outcome of running every plugin in a chain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    /// All plugin warnings, in the order plugins emitted them.
    pub warnings: Vec<Warning>,
    pub plugins_run: usize,
}

impl Report {
    /// True when no plugin reported anything.
    pub fn passed(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Plugins run one after another, each fed the previous plugin's result.
#[derive(Debug, Clone, Default)]
pub struct PluginChain {
    plugins: Vec<PluginSpec>,
}

impl PluginChain {
    pub fn new(plugins: Vec<PluginSpec>) -> Self {
        Self { plugins }
    }

    pub fn from_config(config: &HostConfig) -> Self {
        Self::new(config.plugins.clone())
    }

    pub fn plugins(&self) -> &[PluginSpec] {
        &self.plugins
    }

    /// Runs the chain. The first failing plugin aborts it; warnings gathered
    /// before the failure are not reported.
    pub async fn run(&self, data: Data) -> Result<Report, PluginHostError> {
        let mut data = data;
        for spec in &self.plugins {
            info!(plugin = %spec.name, "Running plugin");
            data = invoke(spec, &data).await?;
        }
        info!(
            plugins = self.plugins.len(),
            warnings = data.plugin_warnings.len(),
            "Plugin chain finished"
        );
        Ok(Report {
            warnings: data.plugin_warnings,
            plugins_run: self.plugins.len(),
        })
    }
}
