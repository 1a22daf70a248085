//! Update record tool definition.

use rmcp::model::{CallToolResult, Tool};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{info, instrument};

use super::{record_id_of, record_of};
use crate::domains::tools::ToolError;
use crate::domains::tools::args::{AuthArgs, parse_json_arg};
use crate::domains::tools::definitions::tool_model;
use crate::domains::tools::envelope::success_result;
use crate::feishu::{BitableApi, BitableRequest, call};

/// Parameters for the update record tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRecordParams {
    #[schemars(description = "Unique identifier (app_token) of the Bitable app")]
    pub app_token: String,

    #[schemars(description = "Unique identifier (table_id) of the table")]
    pub table_id: String,

    #[schemars(description = "ID of the record to update")]
    pub record_id: String,

    #[schemars(
        description = r#"Field values to set, as a JSON string. Fields not listed keep their value. Example: {"Status":"Done","Points":3}"#
    )]
    pub fields: String,

    #[serde(flatten)]
    pub auth: AuthArgs,
}

/// Update record tool - mutates one row.
pub struct UpdateRecordTool;

impl UpdateRecordTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "update_record";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str =
        "Update the fields of an existing record in a Feishu Bitable table. Returns the updated record.";

    /// Execute the tool logic.
    #[instrument(skip_all, fields(record_id = %params.record_id))]
    pub async fn execute(
        params: UpdateRecordParams,
        api: &dyn BitableApi,
    ) -> Result<CallToolResult, ToolError> {
        let fields: Map<String, Value> = parse_json_arg("fields", &params.fields)?;
        info!("Updating {} field(s)", fields.len());

        let requested_id = params.record_id.clone();
        let request = BitableRequest::UpdateRecord {
            app_token: params.app_token,
            table_id: params.table_id,
            record_id: params.record_id,
            fields,
        };
        let payload = call(api, &request, params.auth.token())
            .await
            .into_payload()?;

        let record = record_of(&payload);
        let record_id = record_id_of(&record).unwrap_or(requested_id.as_str());
        Ok(success_result(
            &format!("updated record {}", record_id),
            &record,
        ))
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        tool_model::<UpdateRecordParams>(Self::NAME, Self::DESCRIPTION)
    }
}
