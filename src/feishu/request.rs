//! Bitable remote actions.
//!
//! Each variant of [`BitableRequest`] is one call against
//! `/bitable/v1/apps/...`, carrying its path parameters and body. The
//! client only needs `method()`, `path()` and `body()` to send it.

use std::borrow::Cow;

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::ClientError;

/// A column definition in the remote type-code encoding, as sent when
/// creating a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteFieldSpec {
    pub field_name: String,
    #[serde(rename = "type")]
    pub field_type: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property: Option<Value>,
}

/// Table payload for table creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableSpec {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<RemoteFieldSpec>>,
}

/// Body of a record search.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_names: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Value>,
}

/// Pagination query parameters shared by list-style endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PageQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_token: Option<String>,
}

/// One remote Bitable action.
#[derive(Debug, Clone, PartialEq)]
pub enum BitableRequest {
    CreateRecord {
        app_token: String,
        table_id: String,
        fields: Map<String, Value>,
    },
    SearchRecords {
        app_token: String,
        table_id: String,
        page: PageQuery,
        body: SearchBody,
    },
    GetRecord {
        app_token: String,
        table_id: String,
        record_id: String,
    },
    UpdateRecord {
        app_token: String,
        table_id: String,
        record_id: String,
        fields: Map<String, Value>,
    },
    DeleteRecord {
        app_token: String,
        table_id: String,
        record_id: String,
    },
    ListFields {
        app_token: String,
        table_id: String,
    },
    CreateApp {
        name: String,
        folder_token: Option<String>,
    },
    CreateTable {
        app_token: String,
        table: TableSpec,
    },
}

impl BitableRequest {
    /// Short action name for logs.
    pub fn action(&self) -> &'static str {
        match self {
            Self::CreateRecord { .. } => "record.create",
            Self::SearchRecords { .. } => "record.search",
            Self::GetRecord { .. } => "record.get",
            Self::UpdateRecord { .. } => "record.update",
            Self::DeleteRecord { .. } => "record.delete",
            Self::ListFields { .. } => "field.list",
            Self::CreateApp { .. } => "app.create",
            Self::CreateTable { .. } => "table.create",
        }
    }

    /// HTTP method of the action.
    pub fn method(&self) -> Method {
        match self {
            Self::GetRecord { .. } | Self::ListFields { .. } => Method::GET,
            Self::UpdateRecord { .. } => Method::PUT,
            Self::DeleteRecord { .. } => Method::DELETE,
            Self::CreateRecord { .. }
            | Self::SearchRecords { .. }
            | Self::CreateApp { .. }
            | Self::CreateTable { .. } => Method::POST,
        }
    }

    /// Path relative to the API base URL, including any query string.
    ///
    /// Identifiers are percent-encoded as single path segments, so an id
    /// can never address a different app, table or record.
    pub fn path(&self) -> Result<String, ClientError> {
        let path = match self {
            Self::CreateRecord {
                app_token,
                table_id,
                ..
            } => format!("{}/records", table_path(app_token, table_id)?),
            Self::SearchRecords {
                app_token,
                table_id,
                page,
                ..
            } => {
                let query = serde_urlencoded::to_string(page)
                    .map_err(|e| ClientError::decode(e.to_string()))?;
                let base = format!("{}/records/search", table_path(app_token, table_id)?);
                if query.is_empty() {
                    base
                } else {
                    format!("{}?{}", base, query)
                }
            }
            Self::GetRecord {
                app_token,
                table_id,
                record_id,
            }
            | Self::UpdateRecord {
                app_token,
                table_id,
                record_id,
                ..
            }
            | Self::DeleteRecord {
                app_token,
                table_id,
                record_id,
            } => format!(
                "{}/records/{}",
                table_path(app_token, table_id)?,
                segment("recordId", record_id)?
            ),
            Self::ListFields {
                app_token,
                table_id,
            } => format!("{}/fields", table_path(app_token, table_id)?),
            Self::CreateApp { .. } => "/bitable/v1/apps".to_string(),
            Self::CreateTable { app_token, .. } => {
                format!("/bitable/v1/apps/{}/tables", segment("appToken", app_token)?)
            }
        };
        Ok(path)
    }

    /// JSON body of the action, if it has one.
    pub fn body(&self) -> Option<Value> {
        match self {
            Self::CreateRecord { fields, .. } | Self::UpdateRecord { fields, .. } => {
                Some(serde_json::json!({ "fields": fields }))
            }
            Self::SearchRecords { body, .. } => serde_json::to_value(body).ok(),
            Self::CreateApp { name, folder_token } => {
                let mut body = Map::new();
                body.insert("name".to_string(), Value::String(name.clone()));
                if let Some(folder) = folder_token {
                    body.insert("folder_token".to_string(), Value::String(folder.clone()));
                }
                Some(Value::Object(body))
            }
            Self::CreateTable { table, .. } => Some(serde_json::json!({ "table": table })),
            Self::GetRecord { .. } | Self::DeleteRecord { .. } | Self::ListFields { .. } => None,
        }
    }
}

fn table_path(app_token: &str, table_id: &str) -> Result<String, ClientError> {
    Ok(format!(
        "/bitable/v1/apps/{}/tables/{}",
        segment("appToken", app_token)?,
        segment("tableId", table_id)?
    ))
}

/// Encode `value` as one path segment. Empty, `.` and `..` are rejected
/// since URL normalisation would drop or resolve them.
fn segment<'a>(name: &str, value: &'a str) -> Result<Cow<'a, str>, ClientError> {
    if matches!(value, "" | "." | "..") {
        return Err(ClientError::invalid_request(format!(
            "{} must be a non-empty identifier, got {:?}",
            name, value
        )));
    }
    Ok(urlencoding::encode(value))
}
