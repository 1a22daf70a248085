//! Field type table resource definition.

use serde_json::{Value, json};

use super::ResourceDefinition;
use crate::domains::resources::service::{DynamicResourceType, ResourceContent};
use crate::domains::tools::translator::FieldType;

/// The field type tags `create_table` accepts and the codes they map to.
pub struct FieldTypesResource;

impl FieldTypesResource {
    /// Render the tag table.
    pub fn table() -> Value {
        let types: Vec<Value> = FieldType::ALL
            .iter()
            .map(|t| {
                json!({
                    "tag": t.tag(),
                    "code": t.code(),
                    "property": t.carries_property(),
                })
            })
            .collect();

        json!({
            "types": types,
            "unknownTypes": "dropped",
            "note": "Tags are matched case-insensitively; '-' and '_' are ignored, so singleSelect and single-select are equivalent.",
        })
    }
}

impl ResourceDefinition for FieldTypesResource {
    const URI: &'static str = "feishu://bitable/field-types";
    const NAME: &'static str = "Bitable Field Types";
    const DESCRIPTION: &'static str =
        "Field type tags accepted by create_table and the Bitable type codes they translate to";
    const MIME_TYPE: &'static str = "application/json";

    fn content() -> ResourceContent {
        ResourceContent::Dynamic(DynamicResourceType::FieldTypes)
    }
}
