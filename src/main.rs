// Notion MCP Server Entry Point
// Serves the Notion tools over MCP on stdio; logs go to stderr so stdout stays protocol-only
use anyhow::Result;
use notion_mcp::{config::LogFormat, health, McpConfig, McpServer, NotionClient, ToolRegistry};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_logging(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    dotenv::dotenv().ok();
    let config = McpConfig::from_env()?;

    init_logging(config.log_format);
    info!("Starting Notion MCP Service");

    let client = NotionClient::new(&config)?;
    let registry = ToolRegistry::new(Arc::new(client), config.default_page_size)?;

    info!(
        tools = registry.tool_count(),
        api_base = %config.api_base,
        notion_version = %config.notion_version,
        "Initialized Notion tools"
    );

    if let Some(port) = config.health_port {
        tokio::spawn(async move {
            if let Err(e) = health::serve(port).await {
                tracing::error!("Health server error: {}", e);
            }
        });
    }

    McpServer::new(registry).run().await
}
