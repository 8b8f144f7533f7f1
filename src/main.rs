use anyhow::Result;
use axum::{routing::get, Json, Router};
use clap::Parser;
use nexus_mcp::common::nexus_server::NexusServer;
use nexus_mcp::config::{Cli, Transport};
use rmcp::transport::streamable_http_server::session::local::LocalSessionManager;
use rmcp::transport::{StreamableHttpServerConfig, StreamableHttpService};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{self, EnvFilter};

/// Nexus MCP Server - query Sonatype Nexus for Maven, PyPI and Docker artifacts
/// Run with: cargo run -- --transport stdio
/// Test with: npx @modelcontextprotocol/inspector cargo run -- --transport stdio
#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the tracing subscriber with stderr logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let cli = Cli::parse();
    let settings = Arc::new(cli.settings());

    tracing::info!(
        transport = ?cli.transport,
        credential_source = ?settings.credential_mode,
        "Starting Nexus MCP Server"
    );

    match cli.transport {
        Transport::Stdio => serve_stdio(NexusServer::new(settings)).await,
        Transport::StreamableHttp => {
            serve_http(NexusServer::new(settings), &cli.host, cli.port).await
        }
    }
}

#[cfg(feature = "transport-io")]
async fn serve_stdio(server: NexusServer) -> Result<()> {
    use rmcp::transport::stdio;
    use rmcp::ServiceExt;

    let service = server.serve(stdio()).await.inspect_err(|e| {
        tracing::error!("serving error: {:?}", e);
    })?;

    tracing::info!("Nexus MCP Server is ready and waiting for connections");
    service.waiting().await?;
    Ok(())
}

#[cfg(not(feature = "transport-io"))]
async fn serve_stdio(_server: NexusServer) -> Result<()> {
    anyhow::bail!("stdio transport requires the `transport-io` feature")
}

async fn serve_http(server: NexusServer, host: &str, port: u16) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid server address {}:{}: {}", host, port, e))?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Nexus MCP Server listening on http://{}/mcp", addr);

    let shutdown = CancellationToken::new();
    tokio::spawn(cancel_on_ctrl_c(shutdown.clone()));

    serve_until(listener, http_router(server), shutdown).await?;
    tracing::info!("Nexus MCP Server stopped");
    Ok(())
}

/// `/mcp` streamable HTTP endpoint plus `/health`.
fn http_router(server: NexusServer) -> Router {
    let service = StreamableHttpService::new(
        move || Ok(server.clone()),
        LocalSessionManager::default().into(),
        StreamableHttpServerConfig::default(),
    );

    Router::new()
        .route("/health", get(health))
        .nest_service("/mcp", service)
}

/// Serve until `shutdown` is cancelled, then drain in-flight requests.
async fn serve_until(
    listener: tokio::net::TcpListener,
    router: Router,
    shutdown: CancellationToken,
) -> std::io::Result<()> {
    axum::serve(listener, router)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
}

async fn cancel_on_ctrl_c(shutdown: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for ctrl-c: {}", e);
        return;
    }
    tracing::info!("Shutting down");
    shutdown.cancel();
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "nexus-mcp",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
