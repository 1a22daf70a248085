//! Create Bitable app tool definition.

use rmcp::model::{CallToolResult, Tool};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, instrument};

use crate::domains::tools::ToolError;
use crate::domains::tools::args::AuthArgs;
use crate::domains::tools::definitions::tool_model;
use crate::domains::tools::envelope::{find_str, success_result};
use crate::feishu::{BitableApi, BitableRequest, call};

/// Parameters for the create app tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppParams {
    #[schemars(description = "Name of the new Bitable app")]
    pub name: String,

    #[serde(default)]
    #[schemars(description = "Token of the Drive folder to create the app in (defaults to the root folder)")]
    pub folder_token: Option<String>,

    #[serde(flatten)]
    pub auth: AuthArgs,
}

/// Create app tool - provisions a new Bitable document.
pub struct CreateAppTool;

impl CreateAppTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "create_bitable_app";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Create a new Feishu Bitable app (multi-dimensional spreadsheet). Returns the app token and URL.";

    /// Execute the tool logic.
    #[instrument(skip_all, fields(name = %params.name))]
    pub async fn execute(
        params: CreateAppParams,
        api: &dyn BitableApi,
    ) -> Result<CallToolResult, ToolError> {
        let request = BitableRequest::CreateApp {
            name: params.name,
            folder_token: params.folder_token.filter(|t| !t.is_empty()),
        };
        let payload = call(api, &request, params.auth.token())
            .await
            .into_payload()?;

        let app = payload.get("app").cloned().unwrap_or(Value::Null);
        let app_token = find_str(&app, &["/app_token"]).unwrap_or("unknown");
        info!("Created app {}", app_token);

        Ok(success_result(&format!("created app {}", app_token), &app))
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        tool_model::<CreateAppParams>(Self::NAME, Self::DESCRIPTION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::envelope::text_of;
    use crate::feishu::ApiResponse;
    use crate::feishu::stub::StubBitable;
    use serde_json::json;

    #[tokio::test]
    async fn test_create_app() {
        let stub = StubBitable::new();
        stub.push_response(ApiResponse::success(json!({
            "app": {
                "app_token": "bascnNEW",
                "name": "Roadmap",
                "url": "https://example.feishu.cn/base/bascnNEW"
            }
        })));

        let params: CreateAppParams =
            serde_json::from_value(json!({"name": "Roadmap", "folderToken": ""})).unwrap();
        let result = CreateAppTool::execute(params, &stub).await.unwrap();
        let text = text_of(&result);
        assert!(text.starts_with("Success: created app bascnNEW"));
        assert!(text.contains("https://example.feishu.cn/base/bascnNEW"));

        assert_eq!(
            stub.requests(),
            vec![BitableRequest::CreateApp {
                name: "Roadmap".to_string(),
                folder_token: None,
            }]
        );
    }

    #[tokio::test]
    async fn test_create_app_remote_failure() {
        let stub = StubBitable::new();
        stub.push_response(ApiResponse::failure(91402, "NOTEXIST"));

        let params: CreateAppParams = serde_json::from_value(json!({"name": "x"})).unwrap();
        let err = CreateAppTool::execute(params, &stub).await.unwrap_err();
        assert!(matches!(err, ToolError::Remote(_)));
        assert_eq!(err.to_string(), "NOTEXIST");
    }
}
