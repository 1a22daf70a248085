//! Search records tool definition.
//!
//! Queries rows of a table with an optional filter, view and field
//! projection. One page per call; the caller passes `pageToken` to continue.

use rmcp::model::{CallToolResult, Tool};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, instrument};

use crate::domains::tools::ToolError;
use crate::domains::tools::args::{AuthArgs, parse_json_arg};
use crate::domains::tools::definitions::tool_model;
use crate::domains::tools::envelope::success_result;
use crate::feishu::{BitableApi, BitableRequest, PageQuery, SearchBody, call};

/// Parameters for the search records tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchRecordsParams {
    #[schemars(description = "Unique identifier (app_token) of the Bitable app")]
    pub app_token: String,

    #[schemars(description = "Unique identifier (table_id) of the table")]
    pub table_id: String,

    #[serde(default)]
    #[schemars(
        description = r#"Filter as a JSON string. Example: {"conjunction":"and","conditions":[{"field_name":"Name","operator":"contains","value":["Zhang"]}]}"#
    )]
    pub filter: Option<String>,

    #[serde(default)]
    #[schemars(description = "Unique identifier of the view to search in")]
    pub view_id: Option<String>,

    #[serde(default)]
    #[schemars(description = "Number of records per page, forwarded as is (the remote accepts 1 to 500)")]
    pub page_size: Option<u32>,

    #[serde(default)]
    #[schemars(description = "Page token returned by a previous search, to fetch the next page")]
    pub page_token: Option<String>,

    #[serde(default)]
    #[schemars(description = "Only return these fields of each record")]
    pub field_names: Option<Vec<String>>,

    #[serde(flatten)]
    pub auth: AuthArgs,
}

/// Search records tool.
pub struct SearchRecordsTool;

impl SearchRecordsTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "search_records";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Search records in a Feishu Bitable table. Supports a JSON filter, a view, field projection and pagination. Returns the matching records and the total count.";

    /// Execute the tool logic.
    #[instrument(skip_all, fields(app_token = %params.app_token, table_id = %params.table_id))]
    pub async fn execute(
        params: SearchRecordsParams,
        api: &dyn BitableApi,
    ) -> Result<CallToolResult, ToolError> {
        let filter: Option<Value> = params
            .filter
            .as_deref()
            .filter(|f| !f.trim().is_empty())
            .map(|f| parse_json_arg("filter", f))
            .transpose()?;

        let request = BitableRequest::SearchRecords {
            app_token: params.app_token,
            table_id: params.table_id,
            page: PageQuery {
                page_size: params.page_size,
                page_token: params.page_token,
            },
            body: SearchBody {
                view_id: params.view_id,
                field_names: params.field_names,
                filter,
            },
        };
        let payload = call(api, &request, params.auth.token())
            .await
            .into_payload()?;

        let returned = payload
            .get("items")
            .and_then(Value::as_array)
            .map_or(0, Vec::len);
        let total = payload
            .get("total")
            .and_then(Value::as_u64)
            .unwrap_or(returned as u64);
        info!("Search returned {} of {} record(s)", returned, total);

        let mut summary = format!("found {} record(s), {} returned", total, returned);
        if payload.get("has_more").and_then(Value::as_bool) == Some(true) {
            if let Some(token) = payload.get("page_token").and_then(Value::as_str) {
                summary.push_str(&format!(", more available with pageToken {}", token));
            }
        }

        Ok(success_result(&summary, &payload))
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        tool_model::<SearchRecordsParams>(Self::NAME, Self::DESCRIPTION)
    }
}
