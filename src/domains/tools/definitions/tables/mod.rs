//! Table tools: create tables and list their fields.

pub mod create;
pub mod list_fields;

pub use create::{CreateTableParams, CreateTableTool};
pub use list_fields::{ListFieldsParams, ListFieldsTool};
