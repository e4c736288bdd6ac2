//! MCP stdio server exposing the content-operations platform API.

mod config;
mod logging;
mod server;

use anyhow::Context as _;
use clap::Parser as _;
use content_ops_core::ContentOps;
use content_ops_core::transport::redact_url;
use rmcp::ServiceExt as _;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = config::Cli::parse();
    logging::init_subscriber(&cli.log_level, cli.log_format)?;

    let cfg = cli.resolve().context("load configuration")?;
    let ops = ContentOps::new(&cfg).context("build dispatcher")?;
    info!(
        base_url = %redact_url(&cfg.parsed_base_url()?),
        profile = %cfg.profile,
        operations = ops.catalog().len(),
        "content-ops MCP server starting on stdio"
    );

    let service = server::ContentOpsServer::new(ops)
        .serve(rmcp::transport::stdio())
        .await
        .context("initialize MCP session")?;
    let reason = service.waiting().await.context("MCP session task")?;

    info!(?reason, "content-ops MCP server stopped");
    Ok(())
}
