//! Delete record tool definition.
//!
//! With verification enabled (the default) the record is read first and
//! the delete is only sent when that read returns a record. A record that
//! cannot be read is never deleted.

use rmcp::model::{CallToolResult, Tool};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, instrument, warn};

use super::{record_id_of, record_of};
use crate::domains::tools::ToolError;
use crate::domains::tools::args::AuthArgs;
use crate::domains::tools::definitions::tool_model;
use crate::domains::tools::envelope::success_result;
use crate::feishu::{BitableApi, BitableRequest, RemoteOutcome, call};

/// Parameters for the delete record tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteRecordParams {
    #[schemars(description = "Unique identifier (app_token) of the Bitable app")]
    pub app_token: String,

    #[schemars(description = "Unique identifier (table_id) of the table")]
    pub table_id: String,

    #[schemars(description = "ID of the single record to delete")]
    pub record_id: String,

    #[serde(flatten)]
    pub auth: AuthArgs,
}

/// Delete record tool - removes one row.
pub struct DeleteRecordTool;

impl DeleteRecordTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "delete_record";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Delete a single record from a Feishu Bitable table by its record ID.";

    /// Execute the tool logic.
    #[instrument(skip_all, fields(record_id = %params.record_id, verify))]
    pub async fn execute(
        params: DeleteRecordParams,
        api: &dyn BitableApi,
        verify: bool,
    ) -> Result<CallToolResult, ToolError> {
        tracing::Span::current().record("verify", verify);
        let token = params.auth.token();

        if verify {
            Self::ensure_exists(&params, api, token).await?;
        }

        let request = BitableRequest::DeleteRecord {
            app_token: params.app_token.clone(),
            table_id: params.table_id.clone(),
            record_id: params.record_id.clone(),
        };
        let payload = call(api, &request, token).await.into_payload()?;
        info!("Deleted record {}", params.record_id);

        let deleted_id = payload
            .get("record_id")
            .and_then(Value::as_str)
            .unwrap_or(params.record_id.as_str());
        Ok(success_result(
            &format!("deleted record {}", deleted_id),
            &payload,
        ))
    }

    /// Read the record; fail unless the read succeeds and returns it.
    async fn ensure_exists(
        params: &DeleteRecordParams,
        api: &dyn BitableApi,
        token: Option<&str>,
    ) -> Result<(), ToolError> {
        let lookup = BitableRequest::GetRecord {
            app_token: params.app_token.clone(),
            table_id: params.table_id.clone(),
            record_id: params.record_id.clone(),
        };

        let reason = match call(api, &lookup, token).await {
            RemoteOutcome::Ok(payload) if record_id_of(&record_of(&payload)).is_some() => {
                return Ok(());
            }
            RemoteOutcome::Ok(_) => "no record returned".to_string(),
            RemoteOutcome::RemoteFailure(message) | RemoteOutcome::TransportFailure(message) => {
                message
            }
        };

        warn!("Refusing to delete unreadable record: {}", reason);
        Err(ToolError::RecordNotFound {
            record_id: params.record_id.clone(),
            reason,
        })
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        tool_model::<DeleteRecordParams>(Self::NAME, Self::DESCRIPTION)
    }
}
