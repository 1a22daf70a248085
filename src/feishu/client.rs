//! reqwest-backed Bitable client.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::api::{ApiResponse, BitableApi};
use super::error::ClientError;
use super::request::BitableRequest;
use crate::core::Error;
use crate::core::config::Config;

const TENANT_TOKEN_PATH: &str = "/auth/v3/tenant_access_token/internal";

/// Tokens are refreshed this long before the server-side expiry.
const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(300);

/// Longest body excerpt quoted in a status error.
const MAX_ERROR_BODY: usize = 200;

/// Feishu Open API client authenticated with an application credential.
pub struct LarkClient {
    http: reqwest::Client,
    base_url: String,
    app_id: String,
    app_secret: String,
    static_token: Option<String>,
    tenant_token: Mutex<Option<CachedToken>>,
}

struct CachedToken {
    value: String,
    expires_at: Instant,
}

impl CachedToken {
    fn is_fresh(&self) -> bool {
        Instant::now() < self.expires_at
    }
}

#[derive(Debug, Deserialize)]
struct TenantTokenResponse {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    msg: String,
    tenant_access_token: Option<String>,
    /// Lifetime in seconds.
    #[serde(default)]
    expire: u64,
}

impl LarkClient {
    /// Build a client from the server configuration.
    ///
    /// Fails with [`ClientError::Config`] when the app id or secret is
    /// missing.
    pub fn new(config: &Config) -> Result<Self, ClientError> {
        let (app_id, app_secret) = config
            .credentials
            .require_app_credentials()
            .map_err(|e| match e {
                Error::Config(msg) => ClientError::config(msg),
                other => ClientError::config(other.to_string()),
            })?;

        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("feishu-mcp-server/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = config.feishu.timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ClientError::config(format!("failed to build HTTP client: {}", e)))?;

        info!(
            "Feishu client ready for app {} at {}",
            app_id, config.feishu.base_url
        );

        Ok(Self {
            http,
            base_url: config.feishu.base_url.trim_end_matches('/').to_string(),
            app_id: app_id.to_string(),
            app_secret: app_secret.to_string(),
            static_token: config
                .credentials
                .access_token
                .clone()
                .filter(|t| !t.is_empty()),
            tenant_token: Mutex::new(None),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Per-call user token, then the configured static token, then the
    /// cached tenant token.
    async fn bearer_token(&self, user_token: Option<&str>) -> Result<String, ClientError> {
        if let Some(token) = user_token.filter(|t| !t.is_empty()) {
            return Ok(token.to_string());
        }
        if let Some(token) = &self.static_token {
            return Ok(token.clone());
        }
        self.tenant_token().await
    }

    async fn tenant_token(&self) -> Result<String, ClientError> {
        let mut cached = self.tenant_token.lock().await;
        if let Some(token) = cached.as_ref().filter(|t| t.is_fresh()) {
            return Ok(token.value.clone());
        }

        let token = self.fetch_tenant_token().await?;
        let value = token.value.clone();
        *cached = Some(token);
        Ok(value)
    }

    async fn fetch_tenant_token(&self) -> Result<CachedToken, ClientError> {
        info!("Requesting tenant access token");

        let response = self
            .http
            .post(self.url(TENANT_TOKEN_PATH))
            .json(&serde_json::json!({
                "app_id": self.app_id,
                "app_secret": self.app_secret,
            }))
            .send()
            .await?;

        let status = response.status();
        let body: TenantTokenResponse = response
            .json()
            .await
            .map_err(|e| ClientError::auth(format!("HTTP {}: {}", status, e)))?;

        parse_tenant_token(body)
    }
}

fn parse_tenant_token(body: TenantTokenResponse) -> Result<CachedToken, ClientError> {
    if body.code != 0 {
        return Err(ClientError::auth(format!("{} (code {})", body.msg, body.code)));
    }

    let value = body
        .tenant_access_token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ClientError::auth("response carried no tenant_access_token"))?;

    let lifetime = Duration::from_secs(body.expire).saturating_sub(TOKEN_REFRESH_MARGIN);
    Ok(CachedToken {
        value,
        expires_at: Instant::now() + lifetime,
    })
}

/// Decode a response body. Non-2xx statuses become
/// [`ClientError::Status`] carrying the body's message when it has one.
fn decode_response(status: StatusCode, text: &str) -> Result<ApiResponse, ClientError> {
    let parsed = serde_json::from_str::<ApiResponse>(text);

    if !status.is_success() {
        let message = match parsed {
            Ok(body) if !body.msg.is_empty() || body.error.is_some() => body.failure_message(),
            _ if !text.trim().is_empty() => text.trim().chars().take(MAX_ERROR_BODY).collect(),
            _ => status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string(),
        };
        return Err(ClientError::Status {
            status: status.as_u16(),
            message,
        });
    }

    parsed.map_err(|e| ClientError::decode(e.to_string()))
}

#[async_trait]
impl BitableApi for LarkClient {
    async fn execute(
        &self,
        request: &BitableRequest,
        user_token: Option<&str>,
    ) -> Result<ApiResponse, ClientError> {
        let token = self.bearer_token(user_token).await?;
        let url = self.url(&request.path()?);
        debug!(action = request.action(), method = %request.method(), "{}", url);

        let mut builder = self
            .http
            .request(request.method(), &url)
            .bearer_auth(token);
        if let Some(body) = request.body() {
            builder = builder.json(&body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        decode_response(status, &text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::CredentialsConfig;

    fn configured() -> Config {
        let mut config = Config::default();
        config.credentials = CredentialsConfig {
            app_id: Some("cli_test".to_string()),
            app_secret: Some("secret".to_string()),
            access_token: None,
        };
        config
    }

    #[test]
    fn test_new_requires_credentials() {
        let err = LarkClient::new(&Config::default()).err().unwrap();
        assert!(err.is_config());
        assert!(err.to_string().contains("appId"));
    }

    #[test]
    fn test_new_trims_base_url() {
        let mut config = configured();
        config.feishu.base_url = "https://open.larksuite.com/open-apis/".to_string();
        let client = LarkClient::new(&config).unwrap();
        assert_eq!(
            client.url("/bitable/v1/apps"),
            "https://open.larksuite.com/open-apis/bitable/v1/apps"
        );
    }

    #[tokio::test]
    async fn test_user_token_takes_precedence() {
        let mut config = configured();
        config.credentials.access_token = Some("t-static".to_string());
        let client = LarkClient::new(&config).unwrap();

        assert_eq!(client.bearer_token(Some("u-user")).await.unwrap(), "u-user");
        assert_eq!(client.bearer_token(None).await.unwrap(), "t-static");
        assert_eq!(client.bearer_token(Some("")).await.unwrap(), "t-static");
    }

    #[test]
    fn test_parse_tenant_token() {
        let token = parse_tenant_token(TenantTokenResponse {
            code: 0,
            msg: "ok".to_string(),
            tenant_access_token: Some("t-abc".to_string()),
            expire: 7200,
        })
        .unwrap();
        assert_eq!(token.value, "t-abc");
        assert!(token.is_fresh());

        let err = parse_tenant_token(TenantTokenResponse {
            code: 10014,
            msg: "app secret invalid".to_string(),
            tenant_access_token: None,
            expire: 0,
        })
        .err()
        .unwrap();
        assert!(err.to_string().contains("app secret invalid"));
    }

    #[test]
    fn test_short_lived_token_is_stale() {
        let token = parse_tenant_token(TenantTokenResponse {
            code: 0,
            msg: String::new(),
            tenant_access_token: Some("t-short".to_string()),
            expire: 60,
        })
        .unwrap();
        assert!(!token.is_fresh());
    }

    #[test]
    fn test_decode_success_body() {
        let response = decode_response(
            StatusCode::OK,
            r#"{"code":0,"msg":"success","data":{"record":{"record_id":"rec1"}}}"#,
        )
        .unwrap();
        assert!(response.is_success());
    }

    #[test]
    fn test_decode_error_status_uses_body_message() {
        let err = decode_response(
            StatusCode::BAD_REQUEST,
            r#"{"code":1254045,"msg":"FieldNameNotFound"}"#,
        )
        .err()
        .unwrap();
        match err {
            ClientError::Status { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "FieldNameNotFound");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_decode_error_status_without_body() {
        let err = decode_response(StatusCode::BAD_GATEWAY, "").err().unwrap();
        assert_eq!(err.to_string(), "Bad Gateway (HTTP 502)");
    }

    #[test]
    fn test_decode_garbage_success_body() {
        let err = decode_response(StatusCode::OK, "<html>").err().unwrap();
        assert!(matches!(err, ClientError::Decode(_)));
    }

    mod wire {
        use super::*;
        use serde_json::json;
        use wiremock::matchers::{body_json, header, method, path, query_param};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        const RECORD_PATH: &str = "/bitable/v1/apps/app1/tables/tbl1/records/rec1";

        fn client_for(server: &MockServer, static_token: Option<&str>) -> LarkClient {
            let mut config = configured();
            config.feishu.base_url = server.uri();
            config.credentials.access_token = static_token.map(str::to_string);
            LarkClient::new(&config).unwrap()
        }

        fn get_record() -> BitableRequest {
            BitableRequest::GetRecord {
                app_token: "app1".to_string(),
                table_id: "tbl1".to_string(),
                record_id: "rec1".to_string(),
            }
        }

        fn ok_body(data: serde_json::Value) -> ResponseTemplate {
            ResponseTemplate::new(200).set_body_json(json!({
                "code": 0, "msg": "success", "data": data
            }))
        }

        async fn mount_tenant_token(server: &MockServer, expected_calls: u64) {
            Mock::given(method("POST"))
                .and(path(TENANT_TOKEN_PATH))
                .and(body_json(json!({"app_id": "cli_test", "app_secret": "secret"})))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "code": 0,
                    "msg": "ok",
                    "tenant_access_token": "t-tenant",
                    "expire": 7200
                })))
                .expect(expected_calls)
                .mount(server)
                .await;
        }

        #[tokio::test]
        async fn test_tenant_token_fetched_once_across_calls() {
            let server = MockServer::start().await;
            mount_tenant_token(&server, 1).await;
            Mock::given(method("GET"))
                .and(path(RECORD_PATH))
                .and(header("authorization", "Bearer t-tenant"))
                .respond_with(ok_body(json!({"record": {"record_id": "rec1"}})))
                .expect(2)
                .mount(&server)
                .await;

            let client = client_for(&server, None);
            for _ in 0..2 {
                let response = client.execute(&get_record(), None).await.unwrap();
                assert!(response.is_success());
            }
        }

        #[tokio::test]
        async fn test_user_token_applies_to_one_call_only() {
            let server = MockServer::start().await;
            mount_tenant_token(&server, 1).await;
            Mock::given(method("GET"))
                .and(path(RECORD_PATH))
                .and(header("authorization", "Bearer u-user"))
                .respond_with(ok_body(json!({})))
                .expect(1)
                .mount(&server)
                .await;
            Mock::given(method("GET"))
                .and(path(RECORD_PATH))
                .and(header("authorization", "Bearer t-tenant"))
                .respond_with(ok_body(json!({})))
                .expect(1)
                .mount(&server)
                .await;

            let client = client_for(&server, None);
            client.execute(&get_record(), Some("u-user")).await.unwrap();
            client.execute(&get_record(), None).await.unwrap();
        }

        #[tokio::test]
        async fn test_static_token_skips_tenant_exchange() {
            let server = MockServer::start().await;
            mount_tenant_token(&server, 0).await;
            Mock::given(method("GET"))
                .and(path(RECORD_PATH))
                .and(header("authorization", "Bearer t-static"))
                .respond_with(ok_body(json!({})))
                .expect(1)
                .mount(&server)
                .await;

            let client = client_for(&server, Some("t-static"));
            client.execute(&get_record(), None).await.unwrap();
        }

        #[tokio::test]
        async fn test_methods_and_bodies_on_the_wire() {
            let server = MockServer::start().await;
            Mock::given(method("DELETE"))
                .and(path(RECORD_PATH))
                .respond_with(ok_body(json!({"deleted": true, "record_id": "rec1"})))
                .expect(1)
                .mount(&server)
                .await;
            Mock::given(method("PUT"))
                .and(path(RECORD_PATH))
                .and(body_json(json!({"fields": {"Status": "Done"}})))
                .respond_with(ok_body(json!({"record": {"record_id": "rec1"}})))
                .expect(1)
                .mount(&server)
                .await;
            Mock::given(method("POST"))
                .and(path("/bitable/v1/apps/app1/tables/tbl1/records/search"))
                .and(query_param("page_size", "20"))
                .and(body_json(json!({"view_id": "vew1"})))
                .respond_with(ok_body(json!({"items": [], "total": 0})))
                .expect(1)
                .mount(&server)
                .await;

            let client = client_for(&server, Some("t-static"));

            let delete = BitableRequest::DeleteRecord {
                app_token: "app1".to_string(),
                table_id: "tbl1".to_string(),
                record_id: "rec1".to_string(),
            };
            assert!(client.execute(&delete, None).await.unwrap().is_success());

            let mut fields = serde_json::Map::new();
            fields.insert("Status".to_string(), json!("Done"));
            let update = BitableRequest::UpdateRecord {
                app_token: "app1".to_string(),
                table_id: "tbl1".to_string(),
                record_id: "rec1".to_string(),
                fields,
            };
            assert!(client.execute(&update, None).await.unwrap().is_success());

            let search = BitableRequest::SearchRecords {
                app_token: "app1".to_string(),
                table_id: "tbl1".to_string(),
                page: crate::feishu::PageQuery {
                    page_size: Some(20),
                    page_token: None,
                },
                body: crate::feishu::SearchBody {
                    view_id: Some("vew1".to_string()),
                    ..Default::default()
                },
            };
            assert!(client.execute(&search, None).await.unwrap().is_success());
        }

        #[tokio::test]
        async fn test_error_status_carries_body_message() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path(RECORD_PATH))
                .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                    "code": 1254043, "msg": "RecordIdNotFound"
                })))
                .mount(&server)
                .await;

            let client = client_for(&server, Some("t-static"));
            let err = client.execute(&get_record(), None).await.unwrap_err();
            assert_eq!(err.to_string(), "RecordIdNotFound (HTTP 404)");
        }

        #[tokio::test]
        async fn test_rejected_app_secret_is_auth_error() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path(TENANT_TOKEN_PATH))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "code": 10014, "msg": "app secret invalid"
                })))
                .mount(&server)
                .await;

            let client = client_for(&server, None);
            let err = client.execute(&get_record(), None).await.unwrap_err();
            assert!(matches!(err, ClientError::Auth(_)));
            assert!(err.to_string().contains("app secret invalid"));
        }

        #[tokio::test]
        async fn test_connection_failure_is_request_error() {
            let port = std::net::TcpListener::bind("127.0.0.1:0")
                .unwrap()
                .local_addr()
                .unwrap()
                .port();
            let mut config = configured();
            config.feishu.base_url = format!("http://127.0.0.1:{}", port);
            config.credentials.access_token = Some("t-static".to_string());

            let client = LarkClient::new(&config).unwrap();
            let err = client.execute(&get_record(), None).await.unwrap_err();
            assert!(matches!(err, ClientError::Request(_)));
        }
    }
}
