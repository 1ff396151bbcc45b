//! cascade-thinking - MCP server binary.
//!
//! Loads `~/.cascade/config.toml` (or `$CASCADE_CONFIG`), installs a stderr
//! tracing subscriber and serves the `cascade_thinking` tool over stdio until
//! stdin closes.

use std::io;

use anyhow::{Context, Result};
use tokio::io::{stdin, stdout};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cascade_config::CascadeConfig;
use cascade_core::EngineOptions;
use cascade_thinking::Server;

fn init_tracing(config: Option<&CascadeConfig>) {
    let configured = config.and_then(CascadeConfig::log_filter);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| match configured {
            Some(filter) => EnvFilter::try_new(filter),
            None => EnvFilter::try_new("info"),
        })
        .unwrap_or_else(|_| EnvFilter::new("info"));

    // stdout is the protocol channel.
    tracing_subscriber::registry()
        .with(fmt::layer().with_ansi(false).with_writer(io::stderr))
        .with(env_filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let (config, load_error) = match CascadeConfig::load() {
        Ok(config) => (config, None),
        Err(err) => (None, Some(err)),
    };

    init_tracing(config.as_ref());
    if let Some(err) = load_error {
        tracing::warn!(path = %err.path().display(), "using default configuration: {err}");
    }

    let options = config
        .as_ref()
        .map(EngineOptions::from_config)
        .unwrap_or_default();
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        mode = %options.response_mode,
        thought_log = options.log_thoughts,
        "cascade thinking server running on stdio"
    );

    let mut server = Server::new(options);
    server
        .run(stdin(), stdout())
        .await
        .context("serving stdio")
}
