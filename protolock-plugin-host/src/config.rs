//! Plugin host configuration: reads `protolock-plugins.toml`, which lists the
//! plugins to run, in order, and their deadlines.

use crate::error::PluginHostError;
use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// File name looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "protolock-plugins.toml";

/// Deadline applied to plugins that do not set their own.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// One plugin executable and how to run it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginSpec {
    /// Label used in logs and errors.
    pub name: String,
    /// Program to spawn. Bare names are resolved through `PATH`.
    pub command: String,
    pub args: Vec<String>,
    pub timeout_ms: u64,
}

impl PluginSpec {
    pub fn new(name: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            command: command.into(),
            args: Vec::new(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    /// Spec for an executable given by path, named after its file stem.
    pub fn from_executable(path: &Path) -> Self {
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self::new(name, path.display().to_string())
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

/// Resolved host configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostConfig {
    pub plugins: Vec<PluginSpec>,
}

impl HostConfig {
    /// Loads the config at `path`. A missing file means no plugins.
    pub fn load_from(path: &Path) -> Result<Self, PluginHostError> {
        if !path.exists() {
            info!("No plugin config found at {:?}, running without configured plugins", path);
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .map_err(|e| PluginHostError::Config(format!("failed to read {}: {e}", path.display())))?;
        let config = Self::parse(&contents)
            .map_err(|e| PluginHostError::Config(format!("{}: {e}", path.display())))?;
        info!(plugins = config.plugins.len(), "Loaded plugin config from {:?}", path);
        Ok(config)
    }

    /// Parses config from TOML text.
    pub fn parse(contents: &str) -> Result<Self, PluginHostError> {
        let file: HostFile =
            toml::from_str(contents).map_err(|e| PluginHostError::Config(e.to_string()))?;
        file.into_config()
    }

    /// Appends plugins given directly as executable paths.
    pub fn with_executables<'a>(mut self, paths: impl IntoIterator<Item = &'a Path>) -> Self {
        self.plugins
            .extend(paths.into_iter().map(PluginSpec::from_executable));
        self
    }
}

/// Raw TOML structure matching the `protolock-plugins.toml` format.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct HostFile {
    #[serde(default)]
    defaults: Defaults,
    #[serde(default)]
    plugin: Vec<PluginEntry>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct Defaults {
    #[serde(default = "default_timeout_ms", rename = "timeout-ms")]
    timeout_ms: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
        }
    }
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct PluginEntry {
    name: Option<String>,
    command: String,
    #[serde(default)]
    args: Vec<String>,
    #[serde(rename = "timeout-ms")]
    timeout_ms: Option<u64>,
}

impl HostFile {
    fn into_config(self) -> Result<HostConfig, PluginHostError> {
        let default_timeout = self.defaults.timeout_ms;
        let plugins = self
            .plugin
            .into_iter()
            .map(|entry| {
                if entry.command.trim().is_empty() {
                    return Err(PluginHostError::Config(
                        "plugin entry has an empty command".to_string(),
                    ));
                }
                let spec = match entry.name {
                    Some(name) => PluginSpec::new(name, entry.command),
                    None => PluginSpec::from_executable(Path::new(&entry.command)),
                };
                Ok(spec
                    .with_args(entry.args)
                    .with_timeout_ms(entry.timeout_ms.unwrap_or(default_timeout)))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(HostConfig { plugins })
    }
}
