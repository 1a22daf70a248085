//! Record tools: create, search, read, update and delete rows.

pub mod create;
pub mod delete;
pub mod get;
pub mod search;
pub mod update;

pub use create::{CreateRecordParams, CreateRecordTool};
pub use delete::{DeleteRecordParams, DeleteRecordTool};
pub use get::{GetRecordParams, GetRecordTool};
pub use search::{SearchRecordsParams, SearchRecordsTool};
pub use update::{UpdateRecordParams, UpdateRecordTool};

use serde_json::Value;

use crate::domains::tools::envelope::find_str;

/// The `record` object of a record payload, or `null`.
pub(crate) fn record_of(payload: &Value) -> Value {
    payload.get("record").cloned().unwrap_or(Value::Null)
}

/// Record identifier; the Open API sends both `record_id` and `id`.
pub(crate) fn record_id_of(record: &Value) -> Option<&str> {
    find_str(record, &["/record_id", "/id"])
}
