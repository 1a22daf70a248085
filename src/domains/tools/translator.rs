//! Field-type translation for table creation.
//!
//! Callers describe columns with friendly tags (`text`, `single-select`, ...)
//! and the Open API wants numeric type codes. Fields whose tag is not
//! recognized are dropped from the output rather than rejected.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::feishu::RemoteFieldSpec;

/// The column types `create_table` understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldType {
    Text,
    Number,
    SingleSelect,
    MultipleSelect,
    Date,
    Checkbox,
    Link,
}

impl FieldType {
    /// Every supported type, in type-code order.
    pub const ALL: [FieldType; 7] = [
        FieldType::Text,
        FieldType::Number,
        FieldType::SingleSelect,
        FieldType::MultipleSelect,
        FieldType::Date,
        FieldType::Checkbox,
        FieldType::Link,
    ];

    /// Resolve a caller-supplied tag. Case, `-` and `_` are ignored, so
    /// `singleSelect`, `single_select` and `single-select` are equivalent.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let normalized: String = tag
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "text" => Some(Self::Text),
            "number" => Some(Self::Number),
            "singleselect" => Some(Self::SingleSelect),
            "multipleselect" => Some(Self::MultipleSelect),
            "date" => Some(Self::Date),
            "checkbox" => Some(Self::Checkbox),
            "link" => Some(Self::Link),
            _ => None,
        }
    }

    /// Canonical tag.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::SingleSelect => "single-select",
            Self::MultipleSelect => "multiple-select",
            Self::Date => "date",
            Self::Checkbox => "checkbox",
            Self::Link => "link",
        }
    }

    /// Remote type code.
    pub fn code(self) -> u8 {
        match self {
            Self::Text => 1,
            Self::Number => 2,
            Self::SingleSelect => 3,
            Self::MultipleSelect => 4,
            Self::Date => 5,
            Self::Checkbox => 7,
            Self::Link => 15,
        }
    }

    /// Only selection types forward their `property` (the option list).
    pub fn carries_property(self) -> bool {
        matches!(self, Self::SingleSelect | Self::MultipleSelect)
    }
}

/// A caller-supplied column description.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default)]
    pub property: Option<Value>,
}

/// Translate descriptors into the remote encoding, preserving order and
/// dropping unrecognized types.
pub fn translate(fields: &[FieldDescriptor]) -> Vec<RemoteFieldSpec> {
    fields
        .iter()
        .filter_map(|field| {
            let Some(field_type) = FieldType::from_tag(&field.field_type) else {
                warn!(
                    "Dropping field '{}' with unsupported type '{}'",
                    field.name, field.field_type
                );
                return None;
            };

            Some(RemoteFieldSpec {
                field_name: field.name.clone(),
                field_type: field_type.code(),
                property: if field_type.carries_property() {
                    field.property.clone()
                } else {
                    None
                },
            })
        })
        .collect()
}
