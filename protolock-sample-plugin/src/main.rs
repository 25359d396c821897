//! Sample protolock plugin binary.
//!
//! Reads the exchange payload on stdin and writes it back on stdout with two
//! sample warnings appended.

use protolock_plugin_sdk::Plugin;
use protolock_sample_plugin::SampleCheck;
use std::process::ExitCode;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn main() -> ExitCode {
    // stdout is the payload channel; keep logs on stderr and quiet by default.
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    // The name only tags diagnostics so the host can tell plugins apart.
    Plugin::new("sample").init_with(SampleCheck)
}
