//! List fields tool definition.

use rmcp::model::{CallToolResult, Tool};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, instrument};

use crate::domains::tools::ToolError;
use crate::domains::tools::args::AuthArgs;
use crate::domains::tools::definitions::tool_model;
use crate::domains::tools::envelope::success_result;
use crate::feishu::{BitableApi, BitableRequest, call};

/// Parameters for the list fields tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListFieldsParams {
    #[schemars(description = "Unique identifier (app_token) of the Bitable app")]
    pub app_token: String,

    #[schemars(description = "Unique identifier (table_id) of the table")]
    pub table_id: String,

    #[serde(flatten)]
    pub auth: AuthArgs,
}

/// List fields tool - enumerates the columns of a table.
pub struct ListFieldsTool;

impl ListFieldsTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "list_fields";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "List the fields (columns) of a Feishu Bitable table, including each field's name, ID, type code and property.";

    /// Execute the tool logic.
    #[instrument(skip_all, fields(table_id = %params.table_id))]
    pub async fn execute(
        params: ListFieldsParams,
        api: &dyn BitableApi,
    ) -> Result<CallToolResult, ToolError> {
        let request = BitableRequest::ListFields {
            app_token: params.app_token,
            table_id: params.table_id,
        };
        let payload = call(api, &request, params.auth.token())
            .await
            .into_payload()?;

        let count = payload
            .get("items")
            .and_then(Value::as_array)
            .map_or(0, Vec::len);
        info!("Listed {} field(s)", count);

        Ok(success_result(&format!("found {} field(s)", count), &payload))
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        tool_model::<ListFieldsParams>(Self::NAME, Self::DESCRIPTION)
    }
}
