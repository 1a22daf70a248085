//! Resource service implementation.
//!
//! The ResourceService manages resource discovery and access.
//! Resources are defined in `definitions/` and registered via `registry.rs`.

use std::collections::HashMap;
use std::sync::Arc;

use rmcp::model::{ReadResourceResult, Resource, ResourceContents};
use serde_json::Value;
use tracing::{debug, info};

use super::definitions::{FieldTypesResource, ServerInfoResource};
use super::error::ResourceError;
use super::registry::get_all_resources;
use crate::core::config::Config;

/// Service for listing and reading resources.
pub struct ResourceService {
    config: Arc<Config>,

    /// Key: resource URI.
    resources: HashMap<String, ResourceEntry>,
}

/// An entry in the resource registry.
#[derive(Debug, Clone)]
pub struct ResourceEntry {
    /// The resource metadata.
    pub resource: Resource,

    /// The content provider for this resource.
    pub content: ResourceContent,
}

/// Different types of resource content.
#[derive(Debug, Clone)]
pub enum ResourceContent {
    /// Content computed at read time.
    Dynamic(DynamicResourceType),
}

/// Types of dynamic resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DynamicResourceType {
    /// Field type tag table.
    FieldTypes,

    /// Server information.
    ServerInfo,
}

impl ResourceService {
    /// Create a new ResourceService.
    pub fn new(config: Arc<Config>) -> Self {
        info!("Initializing ResourceService");

        let mut service = Self {
            config,
            resources: HashMap::new(),
        };
        for entry in get_all_resources() {
            service.register_resource(entry);
        }
        service
    }

    fn register_resource(&mut self, entry: ResourceEntry) {
        debug!("Registering resource: {}", entry.resource.raw.uri);
        self.resources
            .insert(entry.resource.raw.uri.to_string(), entry);
    }

    /// List all available resources, ordered by URI.
    pub async fn list_resources(&self) -> Vec<Resource> {
        let mut resources: Vec<Resource> = self
            .resources
            .values()
            .map(|entry| entry.resource.clone())
            .collect();
        resources.sort_by(|a, b| a.raw.uri.cmp(&b.raw.uri));
        resources
    }

    /// Read a resource by URI.
    pub async fn read_resource(&self, uri: &str) -> Result<ReadResourceResult, ResourceError> {
        let entry = self
            .resources
            .get(uri)
            .ok_or_else(|| ResourceError::not_found(uri))?;

        let content = match &entry.content {
            ResourceContent::Dynamic(dynamic_type) => {
                self.resolve_dynamic_content(uri, *dynamic_type)?
            }
        };

        Ok(ReadResourceResult {
            contents: vec![content],
        })
    }

    fn resolve_dynamic_content(
        &self,
        uri: &str,
        dynamic_type: DynamicResourceType,
    ) -> Result<ResourceContents, ResourceError> {
        let value: Value = match dynamic_type {
            DynamicResourceType::FieldTypes => FieldTypesResource::table(),
            DynamicResourceType::ServerInfo => ServerInfoResource::describe(&self.config),
        };

        let text = serde_json::to_string_pretty(&value)
            .map_err(|e| ResourceError::internal(e.to_string()))?;
        Ok(ResourceContents::text(text, uri))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::resources::ResourceDefinition;

    fn service() -> ResourceService {
        ResourceService::new(Arc::new(Config::default()))
    }

    fn text_of(result: &ReadResourceResult) -> &str {
        match &result.contents[0] {
            ResourceContents::TextResourceContents { text, .. } => text,
            other => panic!("unexpected content: {:?}", other),
        }
    }

    #[test]
    fn test_list_resources_sorted() {
        let resources = tokio_test::block_on(service().list_resources());
        let uris: Vec<_> = resources.iter().map(|r| r.raw.uri.as_str()).collect();
        assert_eq!(uris, vec!["feishu://bitable/field-types", "feishu://server/info"]);
    }

    #[tokio::test]
    async fn test_read_field_types() {
        let result = service()
            .read_resource(FieldTypesResource::URI)
            .await
            .unwrap();
        let parsed: Value = serde_json::from_str(text_of(&result)).unwrap();
        assert_eq!(parsed["types"].as_array().unwrap().len(), 7);
    }

    #[tokio::test]
    async fn test_read_server_info_reflects_config() {
        let mut config = Config::default();
        config.tools.verify_before_delete = false;
        let service = ResourceService::new(Arc::new(config));

        let result = service.read_resource(ServerInfoResource::URI).await.unwrap();
        let parsed: Value = serde_json::from_str(text_of(&result)).unwrap();
        assert_eq!(parsed["verifyBeforeDelete"], false);
        assert_eq!(parsed["server"], "feishu-mcp-server");
    }

    #[tokio::test]
    async fn test_read_nonexistent_resource() {
        let err = service()
            .read_resource("feishu://nonexistent")
            .await
            .unwrap_err();
        assert!(matches!(err, ResourceError::NotFound(_)));
    }
}
