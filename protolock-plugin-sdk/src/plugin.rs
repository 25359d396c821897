//! The plugin exchange runtime.
//!
//! One exchange walks `Idle → Decoding → Executing → Encoding → Done`.
//! Failures can only happen while decoding (bad input) or encoding (bad
//! result, closed output) and leave the runtime in `Failed`.

use crate::error::PluginError;
use crate::process::{Process, apply};
use protolock_types::Data;
use std::io::{self, Read, Write};
use std::process::ExitCode;
use tracing::{debug, trace};

/// Where a [`Plugin`] is in its single exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Decoding,
    Executing,
    Encoding,
    Done,
    Failed,
}

/// Runtime for one plugin exchange.
///
/// The name is an opaque label: it is never validated and only appears in
/// diagnostics.
#[derive(Debug)]
pub struct Plugin {
    name: String,
    stage: Stage,
}

impl Plugin {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stage: Stage::Idle,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Runs the exchange over stdin/stdout and returns the process exit code.
    ///
    /// Meant to be returned straight from `main`. The callback runs once, on
    /// this thread, and only if the payload decoded.
    pub fn init<F>(mut self, callback: F) -> ExitCode
    where
        F: FnOnce(Data) -> Data,
    {
        let result = self.serve(
            io::stdin().lock(),
            io::stdout().lock(),
            io::stderr().lock(),
            callback,
        );
        match result {
            Ok(_) => ExitCode::SUCCESS,
            Err(_) => ExitCode::FAILURE,
        }
    }

    /// Like [`Plugin::init`], driven by a [`Process`] implementation.
    pub fn init_with<P: Process>(self, mut process: P) -> ExitCode {
        self.init(move |data| apply(&mut process, data))
    }

    /// Runs one exchange over arbitrary channels.
    ///
    /// On failure a single diagnostic line is written to `diagnostics` and
    /// nothing is written to `output` unless the failure happened mid-write.
    pub fn serve<R, W, D, F>(
        &mut self,
        input: R,
        output: W,
        mut diagnostics: D,
        callback: F,
    ) -> Result<Data, PluginError>
    where
        R: Read,
        W: Write,
        D: Write,
        F: FnOnce(Data) -> Data,
    {
        let result = self.exchange(input, output, callback);
        match &result {
            Ok(data) => {
                debug!(
                    plugin = %self.name,
                    warnings = data.plugin_warnings.len(),
                    "Plugin exchange complete"
                );
            }
            Err(e) => {
                self.stage = Stage::Failed;
                debug!(plugin = %self.name, stage = ?e.stage(), "Plugin exchange failed");
                let _ = writeln!(diagnostics, "{e}");
                let _ = diagnostics.flush();
            }
        }
        result
    }

    fn exchange<R, W, F>(
        &mut self,
        mut input: R,
        mut output: W,
        callback: F,
    ) -> Result<Data, PluginError>
    where
        R: Read,
        W: Write,
        F: FnOnce(Data) -> Data,
    {
        self.enter(Stage::Decoding);
        let mut payload = Vec::new();
        input.read_to_end(&mut payload).map_err(|source| PluginError::Read {
            plugin: self.name.clone(),
            source,
        })?;
        let data = Data::from_json(&payload).map_err(|source| PluginError::Decode {
            plugin: self.name.clone(),
            source,
        })?;
        let incoming = data.plugin_warnings.clone();

        self.enter(Stage::Executing);
        let result = callback(data);

        self.enter(Stage::Encoding);
        if !result.plugin_warnings.starts_with(&incoming) {
            return Err(PluginError::ContractViolation {
                plugin: self.name.clone(),
                expected: incoming.len(),
            });
        }
        let encoded = result.to_json().map_err(|source| PluginError::Encode {
            plugin: self.name.clone(),
            source,
        })?;
        output
            .write_all(&encoded)
            .and_then(|()| output.flush())
            .map_err(|source| PluginError::Write {
                plugin: self.name.clone(),
                source,
            })?;

        self.enter(Stage::Done);
        Ok(result)
    }

    fn enter(&mut self, stage: Stage) {
        trace!(plugin = %self.name, from = ?self.stage, to = ?stage, "Stage transition");
        self.stage = stage;
    }
}
