//! Get record tool definition.

use rmcp::model::{CallToolResult, Tool};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::instrument;

use super::{record_id_of, record_of};
use crate::domains::tools::ToolError;
use crate::domains::tools::args::AuthArgs;
use crate::domains::tools::definitions::tool_model;
use crate::domains::tools::envelope::success_result;
use crate::feishu::{BitableApi, BitableRequest, call};

/// Parameters for the get record tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetRecordParams {
    #[schemars(description = "Unique identifier (app_token) of the Bitable app")]
    pub app_token: String,

    #[schemars(description = "Unique identifier (table_id) of the table")]
    pub table_id: String,

    #[schemars(description = "ID of the record to read")]
    pub record_id: String,

    #[serde(flatten)]
    pub auth: AuthArgs,
}

/// Get record tool - reads one row by ID.
pub struct GetRecordTool;

impl GetRecordTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "get_record";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Get a single record of a Feishu Bitable table by its record ID.";

    /// Execute the tool logic.
    #[instrument(skip_all, fields(record_id = %params.record_id))]
    pub async fn execute(
        params: GetRecordParams,
        api: &dyn BitableApi,
    ) -> Result<CallToolResult, ToolError> {
        let request = BitableRequest::GetRecord {
            app_token: params.app_token,
            table_id: params.table_id,
            record_id: params.record_id,
        };
        let payload = call(api, &request, params.auth.token())
            .await
            .into_payload()?;

        let record = record_of(&payload);
        let summary = match record_id_of(&record) {
            Some(id) => format!("fetched record {}", id),
            None => "fetched record".to_string(),
        };
        Ok(success_result(&summary, &record))
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        tool_model::<GetRecordParams>(Self::NAME, Self::DESCRIPTION)
    }
}
