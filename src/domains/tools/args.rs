//! Argument parsing shared by the tool definitions.

use rmcp::model::JsonObject;
use schemars::JsonSchema;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::ToolError;

/// Deserialize a tool's raw arguments into its parameter struct.
pub fn parse_params<P: DeserializeOwned>(arguments: JsonObject) -> Result<P, ToolError> {
    serde_json::from_value(Value::Object(arguments))
        .map_err(|e| ToolError::invalid_arguments(e.to_string()))
}

/// Parse a JSON-encoded string argument (`fields`, `filter`, ...).
pub fn parse_json_arg<T: DeserializeOwned>(argument: &str, raw: &str) -> Result<T, ToolError> {
    serde_json::from_str(raw).map_err(|e| ToolError::invalid_json(argument, e.to_string()))
}

/// Optional per-call credential accepted by every tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthArgs {
    /// User access token used for this call only, instead of the app's own
    /// tenant credential.
    #[serde(default, alias = "accessToken")]
    #[schemars(
        description = "Optional user access token; when set it authenticates this call instead of the app credential"
    )]
    pub user_access_token: Option<String>,
}

impl AuthArgs {
    /// The per-call token, if one was supplied.
    pub fn token(&self) -> Option<&str> {
        self.user_access_token.as_deref().filter(|t| !t.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Map, json};

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Sample {
        app_token: String,
        #[serde(flatten)]
        auth: AuthArgs,
    }

    #[test]
    fn test_parse_params_camel_case_and_alias() {
        let args = json!({"appToken": "app1", "accessToken": "u-1"});
        let sample: Sample = parse_params(args.as_object().unwrap().clone()).unwrap();
        assert_eq!(sample.app_token, "app1");
        assert_eq!(sample.auth.token(), Some("u-1"));
    }

    #[test]
    fn test_parse_params_missing_field() {
        let err = parse_params::<Sample>(JsonObject::new()).unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
        assert!(err.to_string().contains("appToken"));
    }

    #[test]
    fn test_parse_json_arg_reports_argument() {
        let err = parse_json_arg::<Map<String, Value>>("fields", "{not valid json").unwrap_err();
        let text = err.to_string();
        assert!(text.starts_with("Failed to parse 'fields' as JSON"));
        assert!(text.contains("key must be a string"));
    }

    #[test]
    fn test_parse_json_arg_rejects_wrong_shape() {
        assert!(parse_json_arg::<Map<String, Value>>("fields", "[1, 2]").is_err());
    }

    #[test]
    fn test_empty_token_is_ignored() {
        let auth = AuthArgs {
            user_access_token: Some(String::new()),
        };
        assert_eq!(auth.token(), None);
    }
}
