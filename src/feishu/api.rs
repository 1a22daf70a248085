//! The remote-call seam.
//!
//! [`BitableApi`] is what the tools talk to; [`call`] turns whatever the
//! implementation returns into a [`RemoteOutcome`] so callers never inspect
//! response fields themselves.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::error::ClientError;
use super::request::BitableRequest;

/// The literal `msg` the Open API returns on success.
const SUCCESS_MSG: &str = "success";

/// Standard Open API response envelope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub msg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiErrorDetail>,
}

/// Nested error detail some failures carry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(default)]
    pub message: String,
}

impl ApiResponse {
    /// Build a success response around `data`.
    pub fn success(data: Value) -> Self {
        Self {
            code: 0,
            msg: SUCCESS_MSG.to_string(),
            data: Some(data),
            error: None,
        }
    }

    /// Build a logical failure response.
    pub fn failure(code: i64, msg: impl Into<String>) -> Self {
        Self {
            code,
            msg: msg.into(),
            data: None,
            error: None,
        }
    }

    /// Whether the remote reported success.
    pub fn is_success(&self) -> bool {
        self.code == 0 && self.msg == SUCCESS_MSG
    }

    /// The most specific failure message available: the nested
    /// `error.message`, then the top-level `msg`, then the code.
    pub fn failure_message(&self) -> String {
        if let Some(detail) = self.error.as_ref().filter(|e| !e.message.is_empty()) {
            return detail.message.clone();
        }
        if !self.msg.is_empty() && self.msg != SUCCESS_MSG {
            return self.msg.clone();
        }
        format!("remote call failed with code {}", self.code)
    }
}

/// Classified result of one remote call.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteOutcome {
    /// The remote reported success; carries `data` (or `null`).
    Ok(Value),
    /// The remote answered but reported a logical failure.
    RemoteFailure(String),
    /// The call itself failed (connection, status, decode, auth).
    TransportFailure(String),
}

/// Client for the Bitable endpoints.
///
/// `user_token`, when present, authenticates this single call instead of
/// the application's own credential.
#[async_trait]
pub trait BitableApi: Send + Sync {
    /// Send one request and return the decoded response envelope.
    async fn execute(
        &self,
        request: &BitableRequest,
        user_token: Option<&str>,
    ) -> Result<ApiResponse, ClientError>;
}

/// Send `request` through `api` and classify the result.
pub async fn call(
    api: &dyn BitableApi,
    request: &BitableRequest,
    user_token: Option<&str>,
) -> RemoteOutcome {
    debug!(action = request.action(), "Calling Bitable API");

    match api.execute(request, user_token).await {
        Ok(response) if response.is_success() => {
            RemoteOutcome::Ok(response.data.unwrap_or(Value::Null))
        }
        Ok(response) => {
            let message = response.failure_message();
            warn!(
                action = request.action(),
                code = response.code,
                "Bitable API reported failure: {}",
                message
            );
            RemoteOutcome::RemoteFailure(message)
        }
        Err(e) => {
            warn!(action = request.action(), "Bitable API call failed: {}", e);
            RemoteOutcome::TransportFailure(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feishu::stub::StubBitable;
    use serde_json::json;

    fn list_fields() -> BitableRequest {
        BitableRequest::ListFields {
            app_token: "app".to_string(),
            table_id: "tbl".to_string(),
        }
    }

    #[test]
    fn test_failure_message_prefers_nested_error() {
        let response: ApiResponse = serde_json::from_value(json!({
            "code": 1254,
            "msg": "failure",
            "error": {"message": "quota exceeded"}
        }))
        .unwrap();
        assert!(!response.is_success());
        assert_eq!(response.failure_message(), "quota exceeded");
    }

    #[test]
    fn test_failure_message_falls_back_to_msg_then_code() {
        assert_eq!(
            ApiResponse::failure(91402, "NOTEXIST").failure_message(),
            "NOTEXIST"
        );
        assert_eq!(
            ApiResponse::failure(5, "").failure_message(),
            "remote call failed with code 5"
        );
    }

    #[test]
    fn test_msg_without_code_counts_as_success() {
        let response: ApiResponse =
            serde_json::from_value(json!({"msg": "success", "data": {}})).unwrap();
        assert!(response.is_success());
    }

    #[tokio::test]
    async fn test_call_classifies_outcomes() {
        let stub = StubBitable::new();
        stub.push_response(ApiResponse::success(json!({"items": []})));
        stub.push_response(ApiResponse::failure(1, "failure"));
        stub.push_error(ClientError::Status {
            status: 400,
            message: "bad app_token".to_string(),
        });

        let request = list_fields();
        assert_eq!(
            call(&stub, &request, None).await,
            RemoteOutcome::Ok(json!({"items": []}))
        );
        assert_eq!(
            call(&stub, &request, None).await,
            RemoteOutcome::RemoteFailure("failure".to_string())
        );
        match call(&stub, &request, None).await {
            RemoteOutcome::TransportFailure(msg) => assert!(msg.contains("bad app_token")),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }
}
