//! `keyproxy-function` binary entrypoint.
//!
//! Reads one proxy event as JSON from stdin, forwards it through the gateway
//! and writes the proxy response as JSON to stdout. Logs go to stderr so they
//! never mix with the response document.

use std::io::{self, Read};

use anyhow::{Context, Result};
use keyproxy_config::{load_dotenv, ProxyConfig};
use keyproxy_gateway::Gateway;
use keyproxy_serverless::{handle_event, ProxyEvent};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    load_dotenv();
    let config = ProxyConfig::from_env().context("invalid configuration")?;
    let gateway = Gateway::from_config(&config).context("failed to build upstream client")?;

    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("failed to read event from stdin")?;
    let event: ProxyEvent = serde_json::from_str(&input).context("failed to parse proxy event")?;

    let response = handle_event(&gateway, &config.server.base_path, event).await;

    println!(
        "{}",
        serde_json::to_string(&response).context("failed to encode proxy response")?
    );
    Ok(())
}
