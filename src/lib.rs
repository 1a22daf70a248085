//! Feishu Bitable MCP Server Library
//!
//! This crate exposes Feishu Bitable record, table and app operations as
//! Model Context Protocol (MCP) tools.
//!
//! # Architecture
//!
//! - **core**: Configuration, error handling, the MCP server and transports
//! - **domains**: Business logic organized by bounded contexts
//!   - **tools**: The Bitable tools, their dispatcher and the field translator
//!   - **resources**: Read-only documents describing the server and field types
//! - **feishu**: The Open API client and the `BitableApi` seam tools call through
//!
//! # Example
//!
//! ```rust,no_run
//! use feishu_mcp_server::{core::McpServer, core::Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     config.credentials.require_app_credentials()?;
//!     let server = McpServer::new(config);
//!     // Start the server...
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;
pub mod feishu;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
