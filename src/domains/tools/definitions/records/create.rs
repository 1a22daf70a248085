//! Create record tool definition.
//!
//! Inserts one row into a Bitable table.

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

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the create record tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecordParams {
    #[schemars(description = "Unique identifier (app_token) of the Bitable app")]
    pub app_token: String,

    #[schemars(description = "Unique identifier (table_id) of the table")]
    pub table_id: String,

    /// JSON-encoded object mapping field names to values.
    #[schemars(
        description = r#"Field values of the new record as a JSON string. Example: {"Text":"content","Single select":"Option 1","Multi select":["Option 1","Option 2"],"Checkbox":true,"Person":[{"id":"ou_xxx"}]}"#
    )]
    pub fields: String,

    #[serde(flatten)]
    pub auth: AuthArgs,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Create record tool - inserts one row.
pub struct CreateRecordTool;

impl CreateRecordTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "create_record";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str =
        "Create a record (row) in a Feishu Bitable table. Returns the new record and its ID.";

    /// Execute the tool logic.
    #[instrument(skip_all, fields(app_token = %params.app_token, table_id = %params.table_id))]
    pub async fn execute(
        params: CreateRecordParams,
        api: &dyn BitableApi,
    ) -> Result<CallToolResult, ToolError> {
        let fields: Map<String, Value> = parse_json_arg("fields", &params.fields)?;
        info!("Creating record with {} field(s)", fields.len());

        let request = BitableRequest::CreateRecord {
            app_token: params.app_token,
            table_id: params.table_id,
            fields,
        };
        let payload = call(api, &request, params.auth.token())
            .await
            .into_payload()?;

        let record = record_of(&payload);
        let record_id = record_id_of(&record).unwrap_or("unknown");
        info!("Created record {}", record_id);

        Ok(success_result(
            &format!("created record {}", record_id),
            &record,
        ))
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        tool_model::<CreateRecordParams>(Self::NAME, Self::DESCRIPTION)
    }
}

// ============================================================================
// Tests
// ============================================================================
