//! Feishu Open API client for Bitable.
//!
//! - `request.rs` - the remote actions and their wire shapes
//! - `api.rs` - the `BitableApi` seam and outcome classification
//! - `client.rs` - the reqwest-backed client with tenant token caching
//! - `handle.rs` - the lazily constructed, shared client handle
//! - `error.rs` - client error types

mod api;
mod client;
mod error;
mod handle;
mod request;

#[cfg(test)]
pub(crate) mod stub;

pub use api::{ApiErrorDetail, ApiResponse, BitableApi, RemoteOutcome, call};
pub use client::LarkClient;
pub use error::ClientError;
pub use handle::ClientHandle;
pub use request::{BitableRequest, PageQuery, RemoteFieldSpec, SearchBody, TableSpec};
