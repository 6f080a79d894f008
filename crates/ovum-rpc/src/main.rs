//! Ovum RPC Server - JSON-RPC backend for Electron IPC.
//!
//! This binary provides a JSON-RPC 2.0 server that wraps the ovum-client
//! library for communication with the Electron main process hosting the
//! admin console and patient portal shells.

mod handlers;
mod server;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "ovum-rpc")]
#[command(about = "JSON-RPC server for the Ovum client library")]
struct Args {
    /// Port to listen on (0 = auto-assign)
    #[arg(short, long, default_value = "0")]
    port: u16,

    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Backend base URL (defaults to OVUM_API_BASE_URL or localhost)
    #[arg(long)]
    base_url: Option<String>,

    /// Directory for the persisted token file (defaults to the platform
    /// config directory)
    #[arg(long)]
    config_dir: Option<PathBuf>,

    /// Keep login tokens in memory only
    #[arg(long)]
    ephemeral: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .init();

    info!("Starting Ovum RPC Server");

    // Assemble the client
    let mut builder = ovum_client::OvumClient::builder();
    if let Some(url) = args.base_url {
        builder = builder.base_url(url);
    }
    if let Some(dir) = args.config_dir {
        builder = builder.config_dir(dir);
    }
    if args.ephemeral {
        builder = builder.ephemeral_tokens();
    }
    let client = builder.build()?;

    info!("Backend base URL: {}", client.config().base_url);

    // Start the server
    let addr = server::start_server(client, &args.host, args.port).await?;

    // Print port for Electron to read (intentional stdout for IPC)
    // This format must match what the bridge process expects
    println!("RPC_PORT={}", addr.port());

    info!("RPC server running on {}", addr);

    // Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received, exiting");

    Ok(())
}
