mod config;
mod error;
mod index;
mod loader;
mod map;
mod model;
mod parser;
mod search;
mod server;
mod source_url;
mod store;
mod validate;

use std::sync::Arc;

use rmcp::{ServiceExt, transport::stdio};
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use config::Config;
use loader::FeedLoader;
use server::LocationExplorerServer;
use store::FeedStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout is reserved for MCP JSON-RPC
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    info!("starting location-explorer MCP server");

    let config = Config::from_env()?;
    info!(
        sheet_url = %config.sheet_url,
        sheets_host = %config.sheets_host,
        timeout_secs = config.client.timeout.as_secs(),
        "configuration loaded"
    );

    let loader = Arc::new(FeedLoader::new(config.clone())?);
    info!(export_url = %loader.export_url()?, "feed export url derived");

    let store = Arc::new(FeedStore::new());

    // A failed first load is not fatal: clients see "feed not loaded" and can
    // retry with reload_feed.
    match store.reload(loader.load()).await {
        Ok(outcome) => info!(?outcome, "initial feed load complete"),
        Err(e) if e.is_retriable() => {
            warn!(error = %e, "initial feed load failed, serving without data until reload_feed")
        }
        Err(e) => error!(error = %e, "initial feed load failed, fix the sheet and call reload_feed"),
    }

    let server = LocationExplorerServer::new(store, loader);

    if let Some(addr) = config.tcp_listen_addr.as_deref() {
        let listener = TcpListener::bind(addr).await?;
        info!(listen_addr = %addr, "MCP server ready, serving on TCP");
        loop {
            let (stream, peer) = listener.accept().await?;
            let server = server.clone();
            tokio::spawn(async move {
                info!(peer = %peer, "MCP client connected");
                let service = server.serve(stream).await.inspect_err(|e| {
                    error!(error = %e, "MCP server error");
                })?;
                service.waiting().await?;
                info!(peer = %peer, "MCP client disconnected");
                Ok::<(), anyhow::Error>(())
            });
        }
    } else {
        info!("MCP server ready, serving on stdio");
        let service = server.serve(stdio()).await.inspect_err(|e| {
            error!(error = %e, "MCP server error");
        })?;
        service.waiting().await?;
        info!("MCP server shut down");
    }
    Ok(())
}
