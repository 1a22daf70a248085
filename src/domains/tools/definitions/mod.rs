//! Tool definitions module.
//!
//! This module exports all available tool definitions.
//! Each tool is defined in its own file for better maintainability.

pub mod apps;
pub mod records;
pub mod tables;

use rmcp::{handler::server::tool::cached_schema_for_type, model::Tool};
use schemars::JsonSchema;

pub use apps::{CreateAppParams, CreateAppTool};
pub use records::{
    CreateRecordParams, CreateRecordTool, DeleteRecordParams, DeleteRecordTool, GetRecordParams,
    GetRecordTool, SearchRecordsParams, SearchRecordsTool, UpdateRecordParams, UpdateRecordTool,
};
pub use tables::{CreateTableParams, CreateTableTool, ListFieldsParams, ListFieldsTool};

/// Create a Tool model (metadata) with the input schema of `P`.
pub(crate) fn tool_model<P: JsonSchema + 'static>(
    name: &'static str,
    description: &'static str,
) -> Tool {
    Tool {
        name: name.into(),
        description: Some(description.into()),
        input_schema: cached_schema_for_type::<P>(),
        annotations: None,
        output_schema: None,
        icons: None,
        meta: None,
        title: None,
    }
}

