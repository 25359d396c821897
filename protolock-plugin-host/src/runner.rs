//! Single plugin invocation.

use crate::config::PluginSpec;
use crate::error::PluginHostError;
use protolock_types::Data;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

/// Runs one plugin process over `data` and returns the payload it wrote back.
///
/// The child is killed if it outlives `spec.timeout_ms`. Output from a child
/// that exits non-zero is discarded, and the returned payload must keep
/// every warning of `data` in front.
pub async fn invoke(spec: &PluginSpec, data: &Data) -> Result<Data, PluginHostError> {
    let payload = data.to_json()?;

    let mut child = Command::new(&spec.command)
        .args(&spec.args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| PluginHostError::Spawn {
            plugin_id: spec.name.clone(),
            source,
        })?;
    debug!(plugin = %spec.name, pid = ?child.id(), bytes = payload.len(), "Plugin spawned");

    let mut stdin = child.stdin.take().ok_or_else(|| PluginHostError::Io {
        plugin_id: spec.name.clone(),
        source: std::io::Error::other("plugin stdin not captured"),
    })?;
    let feed = async move {
        stdin.write_all(&payload).await?;
        stdin.shutdown().await
    };
    // Feed and drain together so a plugin that writes before it finishes
    // reading cannot fill its pipe and stall.
    let exchange = async { tokio::join!(feed, child.wait_with_output()) };

    let (fed, output) = tokio::time::timeout(Duration::from_millis(spec.timeout_ms), exchange)
        .await
        .map_err(|_| {
            warn!(plugin = %spec.name, timeout_ms = spec.timeout_ms, "Plugin timed out, killed");
            PluginHostError::Timeout {
                plugin_id: spec.name.clone(),
                timeout_ms: spec.timeout_ms,
            }
        })?;
    let output = output.map_err(|source| PluginHostError::Io {
        plugin_id: spec.name.clone(),
        source,
    })?;

    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    if !output.status.success() {
        return Err(PluginHostError::PluginFailed {
            plugin_id: spec.name.clone(),
            status: output.status,
            stderr,
        });
    }
    if !stderr.is_empty() {
        debug!(plugin = %spec.name, %stderr, "Plugin diagnostics");
    }
    fed.map_err(|source| PluginHostError::Io {
        plugin_id: spec.name.clone(),
        source,
    })?;

    let result = Data::from_json(&output.stdout).map_err(|source| {
        PluginHostError::InvalidResponse {
            plugin_id: spec.name.clone(),
            source,
        }
    })?;
    if !result.preserves_warnings_of(data) {
        return Err(PluginHostError::ContractViolation {
            plugin_id: spec.name.clone(),
        });
    }
    debug!(
        plugin = %spec.name,
        added = result.plugin_warnings.len() - data.plugin_warnings.len(),
        "Plugin returned"
    );
    Ok(result)
}
