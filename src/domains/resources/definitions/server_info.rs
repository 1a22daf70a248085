//! Server info resource definition.

use serde_json::{Value, json};

use super::ResourceDefinition;
use crate::core::config::Config;
use crate::domains::resources::service::{DynamicResourceType, ResourceContent};

/// Server information resource (dynamic).
pub struct ServerInfoResource;

impl ServerInfoResource {
    /// Describe the running server. Credentials are never included.
    pub fn describe(config: &Config) -> Value {
        json!({
            "server": config.server.name,
            "version": env!("CARGO_PKG_VERSION"),
            "transport": config.transport.description(),
            "baseUrl": config.feishu.base_url,
            "verifyBeforeDelete": config.tools.verify_before_delete,
            "staticAccessToken": config.credentials.access_token.is_some(),
        })
    }
}

impl ResourceDefinition for ServerInfoResource {
    const URI: &'static str = "feishu://server/info";
    const NAME: &'static str = "Server Information";
    const DESCRIPTION: &'static str =
        "Name, version, API endpoint and delete policy of this MCP server";
    const MIME_TYPE: &'static str = "application/json";

    fn content() -> ResourceContent {
        ResourceContent::Dynamic(DynamicResourceType::ServerInfo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_info_metadata() {
        assert_eq!(ServerInfoResource::URI, "feishu://server/info");
        assert_eq!(ServerInfoResource::MIME_TYPE, "application/json");
    }

    #[test]
    fn test_server_info_hides_secrets() {
        let mut config = Config::default();
        config.credentials.app_secret = Some("s3cret".to_string());
        config.credentials.access_token = Some("t-token".to_string());

        let info = ServerInfoResource::describe(&config).to_string();
        assert!(!info.contains("s3cret"));
        assert!(!info.contains("t-token"));
        assert!(info.contains("\"verifyBeforeDelete\":true"));
    }
}
