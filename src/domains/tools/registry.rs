//! Tool Registry - central registration and dispatch for all tools.
//!
//! This module provides:
//! - The static list of tools and their schemas
//! - Dispatch of tool calls to the matching definition
//!
//! [`ToolRegistry::invoke`] never fails: every error is rendered into an
//! `Error:` envelope before it leaves this module.

use rmcp::model::{CallToolResult, JsonObject, Tool};
use tracing::{debug, instrument, warn};

use crate::core::config::ToolsConfig;
use crate::feishu::ClientHandle;

use super::ToolError;
use super::args::parse_params;
use super::definitions::{
    CreateAppTool, CreateRecordTool, CreateTableTool, DeleteRecordTool, GetRecordTool,
    ListFieldsTool, SearchRecordsTool, UpdateRecordTool,
};
use super::envelope::error_result;

// ============================================================================
// Tool Registry
// ============================================================================

/// Tool registry - owns the client handle and routes calls by name.
#[derive(Clone)]
pub struct ToolRegistry {
    client: ClientHandle,
    tools: ToolsConfig,
}

impl ToolRegistry {
    /// Create a new tool registry.
    pub fn new(client: ClientHandle, tools: ToolsConfig) -> Self {
        Self { client, tools }
    }

    /// Get all tool names.
    pub fn tool_names(&self) -> Vec<&'static str> {
        vec![
            CreateRecordTool::NAME,
            SearchRecordsTool::NAME,
            GetRecordTool::NAME,
            UpdateRecordTool::NAME,
            DeleteRecordTool::NAME,
            ListFieldsTool::NAME,
            CreateAppTool::NAME,
            CreateTableTool::NAME,
        ]
    }

    /// Get all tools as Tool models (metadata).
    ///
    /// This is the single source of truth for all available tools.
    /// Both HTTP and STDIO transports use this to get tool metadata.
    pub fn get_all_tools() -> Vec<Tool> {
        vec![
            CreateRecordTool::to_tool(),
            SearchRecordsTool::to_tool(),
            GetRecordTool::to_tool(),
            UpdateRecordTool::to_tool(),
            DeleteRecordTool::to_tool(),
            ListFieldsTool::to_tool(),
            CreateAppTool::to_tool(),
            CreateTableTool::to_tool(),
        ]
    }

    /// Invoke a tool by name.
    #[instrument(skip(self, arguments))]
    pub async fn invoke(&self, name: &str, arguments: Option<JsonObject>) -> CallToolResult {
        match self.dispatch(name, arguments).await {
            Ok(result) => {
                debug!("Tool call succeeded");
                result
            }
            Err(e) => error_result(&e.to_string()),
        }
    }

    async fn dispatch(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> Result<CallToolResult, ToolError> {
        let arguments = arguments.ok_or(ToolError::MissingArguments)?;

        if !self.tool_names().contains(&name) {
            warn!("Unknown tool requested: {}", name);
            return Err(ToolError::not_found(name));
        }

        match name {
            CreateRecordTool::NAME => {
                let params = parse_params(arguments)?;
                CreateRecordTool::execute(params, self.client.get().await?.as_ref()).await
            }
            SearchRecordsTool::NAME => {
                let params = parse_params(arguments)?;
                SearchRecordsTool::execute(params, self.client.get().await?.as_ref()).await
            }
            GetRecordTool::NAME => {
                let params = parse_params(arguments)?;
                GetRecordTool::execute(params, self.client.get().await?.as_ref()).await
            }
            UpdateRecordTool::NAME => {
                let params = parse_params(arguments)?;
                UpdateRecordTool::execute(params, self.client.get().await?.as_ref()).await
            }
            DeleteRecordTool::NAME => {
                let params = parse_params(arguments)?;
                let api = self.client.get().await?;
                DeleteRecordTool::execute(params, api.as_ref(), self.tools.verify_before_delete)
                    .await
            }
            ListFieldsTool::NAME => {
                let params = parse_params(arguments)?;
                ListFieldsTool::execute(params, self.client.get().await?.as_ref()).await
            }
            CreateAppTool::NAME => {
                let params = parse_params(arguments)?;
                CreateAppTool::execute(params, self.client.get().await?.as_ref()).await
            }
            CreateTableTool::NAME => {
                let params = parse_params(arguments)?;
                CreateTableTool::execute(params, self.client.get().await?.as_ref()).await
            }
            _ => Err(ToolError::not_found(name)),
        }
    }
}
