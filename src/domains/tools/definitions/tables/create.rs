//! Create table tool definition.
//!
//! Field descriptors arrive as a JSON string of `{name, type, property?}`
//! objects and go through the field translator before being sent.

use rmcp::model::{CallToolResult, Tool};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{info, instrument, warn};

use crate::domains::tools::ToolError;
use crate::domains::tools::args::{AuthArgs, parse_json_arg};
use crate::domains::tools::definitions::tool_model;
use crate::domains::tools::envelope::{find_str, success_result};
use crate::domains::tools::translator::{FieldDescriptor, translate};
use crate::feishu::{BitableApi, BitableRequest, TableSpec, call};

/// Parameters for the create table tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTableParams {
    #[schemars(description = "Unique identifier (app_token) of the Bitable app")]
    pub app_token: String,

    #[schemars(description = "Name of the table to create")]
    pub name: String,

    #[serde(default)]
    #[schemars(
        description = r#"Fields to create, as a JSON array string. Supported types: text, number, single-select, multiple-select, date, checkbox, link. Example: [{"name":"Title","type":"text"},{"name":"Status","type":"singleSelect","property":{"options":[{"name":"Todo"},{"name":"Doing"},{"name":"Done"}]}}]"#
    )]
    pub fields: Option<String>,

    #[serde(default)]
    #[schemars(description = "Free-form description of the table, echoed in the result")]
    pub description: Option<String>,

    #[serde(flatten)]
    pub auth: AuthArgs,
}

/// Create table tool - adds a table to an existing app.
pub struct CreateTableTool;

impl CreateTableTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "create_table";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Create a table in a Feishu Bitable app, optionally with typed fields. Fields with an unsupported type are skipped. Returns the new table ID.";

    /// Execute the tool logic.
    #[instrument(skip_all, fields(app_token = %params.app_token, name = %params.name))]
    pub async fn execute(
        params: CreateTableParams,
        api: &dyn BitableApi,
    ) -> Result<CallToolResult, ToolError> {
        let descriptors: Vec<FieldDescriptor> = match params.fields.as_deref() {
            Some(raw) if !raw.trim().is_empty() => parse_json_arg("fields", raw)?,
            _ => Vec::new(),
        };

        let fields = translate(&descriptors);
        if fields.len() < descriptors.len() {
            warn!(
                "{} of {} field(s) skipped for unsupported types",
                descriptors.len() - fields.len(),
                descriptors.len()
            );
        }
        info!("Creating table with {} field(s)", fields.len());

        let request = BitableRequest::CreateTable {
            app_token: params.app_token,
            table: TableSpec {
                name: params.name,
                fields: if fields.is_empty() { None } else { Some(fields) },
            },
        };
        let payload = call(api, &request, params.auth.token())
            .await
            .into_payload()?;

        let table_id = find_str(&payload, &["/table_id"]).unwrap_or("unknown");
        let summary = match params.description.as_deref().filter(|d| !d.is_empty()) {
            Some(description) => format!("created table {} ({})", table_id, description),
            None => format!("created table {}", table_id),
        };
        Ok(success_result(&summary, &payload))
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        tool_model::<CreateTableParams>(Self::NAME, Self::DESCRIPTION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::envelope::text_of;
    use crate::feishu::stub::StubBitable;
    use crate::feishu::{ApiResponse, RemoteFieldSpec};
    use serde_json::json;

    fn params(fields: Option<&str>) -> CreateTableParams {
        CreateTableParams {
            app_token: "app1".to_string(),
            name: "Issues".to_string(),
            fields: fields.map(str::to_string),
            description: None,
            auth: AuthArgs::default(),
        }
    }

    #[tokio::test]
    async fn test_create_table_translates_fields() {
        let stub = StubBitable::new();
        stub.push_response(ApiResponse::success(json!({
            "table_id": "tblNEW",
            "default_view_id": "vew1",
            "field_id_list": ["fld1", "fld2"]
        })));

        let raw = r#"[
            {"name":"Title","type":"text"},
            {"name":"Weird","type":"bogus"},
            {"name":"Status","type":"singleSelect","property":{"options":[{"name":"Todo"}]}}
        ]"#;
        let result = CreateTableTool::execute(params(Some(raw)), &stub)
            .await
            .unwrap();
        assert!(text_of(&result).starts_with("Success: created table tblNEW"));

        assert_eq!(
            stub.requests(),
            vec![BitableRequest::CreateTable {
                app_token: "app1".to_string(),
                table: TableSpec {
                    name: "Issues".to_string(),
                    fields: Some(vec![
                        RemoteFieldSpec {
                            field_name: "Title".to_string(),
                            field_type: 1,
                            property: None,
                        },
                        RemoteFieldSpec {
                            field_name: "Status".to_string(),
                            field_type: 3,
                            property: Some(json!({"options": [{"name": "Todo"}]})),
                        },
                    ]),
                },
            }]
        );
    }

    #[tokio::test]
    async fn test_create_table_without_fields() {
        let stub = StubBitable::new();
        stub.push_response(ApiResponse::success(json!({"table_id": "tblX"})));

        let mut p = params(None);
        p.description = Some("sprint backlog".to_string());
        let result = CreateTableTool::execute(p, &stub).await.unwrap();
        assert!(text_of(&result).starts_with("Success: created table tblX (sprint backlog)"));
        assert!(matches!(
            &stub.requests()[0],
            BitableRequest::CreateTable { table, .. } if table.fields.is_none()
        ));
    }

    #[tokio::test]
    async fn test_create_table_bad_fields_json() {
        let stub = StubBitable::new();
        let err = CreateTableTool::execute(params(Some(r#"{"name":"Title"}"#)), &stub)
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidJson { .. }));
        assert!(stub.requests().is_empty());
    }
}
