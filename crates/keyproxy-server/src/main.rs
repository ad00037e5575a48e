//! `keyproxy-server` binary entrypoint.
//!
//! Configuration comes from environment variables (optionally a `.env` file);
//! command-line flags override the bind address and mount prefix.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use keyproxy_config::{load_dotenv, load_dotenv_from, ProxyConfig};
use keyproxy_server::serve;

#[derive(Debug, Parser)]
#[command(name = "keyproxy-server", version, about = "Gemini API key-injecting proxy")]
struct Cli {
    /// Interface to bind (overrides HOST)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Mount prefix for the forwarding routes (overrides API_BASE_PATH)
    #[arg(long)]
    base_path: Option<String>,

    /// Environment file to load instead of searching for `.env`
    #[arg(long)]
    env_file: Option<PathBuf>,
}

#[actix_web::main]
async fn main() -> Result<()> {
    // Respect `RUST_LOG` if set; otherwise default to info.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.env_file.as_deref() {
        Some(path) => load_dotenv_from(path)?,
        None => {
            load_dotenv();
        }
    }

    let mut config = ProxyConfig::from_env().context("invalid configuration")?;
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(base_path) = cli.base_path.as_deref() {
        config.server = config
            .server
            .with_base_path(base_path)
            .context("invalid --base-path")?;
    }

    serve(config).await
}
