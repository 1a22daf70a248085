//! MCP Server Entry Point
//!
//! This is the main entry point for the MCP server. It initializes logging,
//! loads configuration, and starts the server with the configured transport.

use anyhow::Result;
use clap::Parser;
use tracing::{Level, error, info};
use tracing_subscriber::{EnvFilter, fmt};

use feishu_mcp_server::core::{Config, McpServer, TransportService};

/// Feishu Bitable MCP server.
#[derive(Debug, Parser)]
#[command(name = "feishu-mcp-server", version, about)]
struct Cli {
    /// Serve over stdin/stdout.
    #[arg(long, conflicts_with = "http")]
    stdio: bool,

    /// Serve JSON-RPC over HTTP.
    #[arg(long)]
    http: bool,

    /// Credentials as JSON: {"appId": "...", "appSecret": "...", "accessToken": "..."}.
    /// Environment variables take precedence.
    #[arg(long, value_name = "JSON")]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration from environment
    let mut config = Config::from_env();

    // Initialize logging
    init_logging(&config.logging.level, config.logging.with_timestamps);

    info!("Starting {} v{}", config.server.name, config.server.version);

    if let Some(raw) = cli.config.as_deref() {
        config.credentials.merge_json(raw)?;
    }
    apply_transport_flags(&cli, &mut config)?;

    if let Err(e) = config.credentials.require_app_credentials() {
        error!("{}", e);
        return Err(e.into());
    }
    info!(
        "Delete verification {}",
        if config.tools.verify_before_delete {
            "enabled"
        } else {
            "disabled"
        }
    );

    // Create the MCP server
    let server = McpServer::new(config.clone());

    info!("Server initialized");

    // Create and run the transport service
    let transport = TransportService::new(config.transport);
    transport.run(server).await?;

    info!("Server shutting down");

    Ok(())
}

/// Apply `--stdio` / `--http` over the environment's transport choice.
fn apply_transport_flags(cli: &Cli, config: &mut Config) -> Result<()> {
    if cli.stdio {
        #[cfg(feature = "stdio")]
        {
            config.transport = feishu_mcp_server::core::TransportConfig::stdio();
        }
        #[cfg(not(feature = "stdio"))]
        {
            anyhow::bail!("--stdio requires the `stdio` feature");
        }
    }

    if cli.http {
        #[cfg(feature = "http")]
        {
            config.transport = feishu_mcp_server::core::TransportConfig::http();
        }
        #[cfg(not(feature = "http"))]
        {
            anyhow::bail!("--http requires the `http` feature");
        }
    }

    Ok(())
}

/// Initialize the logging subsystem.
///
/// Logs always go to stderr; stdout belongs to the stdio transport.
fn init_logging(level: &str, with_timestamps: bool) {
    let level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr);

    if with_timestamps {
        builder.init();
    } else {
        builder.without_time().init();
    }
}
