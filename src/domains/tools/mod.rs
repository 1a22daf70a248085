//! Tools domain module.
//!
//! Tools are the Bitable operations MCP clients can call. Every call goes
//! through [`ToolRegistry::invoke`], which always answers with a result
//! envelope, never an error.
//!
//! ## Architecture
//!
//! - `definitions/` - Individual tool implementations (one file per tool)
//! - `registry.rs` - Central tool registry and dispatch
//! - `args.rs` - Argument parsing shared by all tools
//! - `envelope.rs` - `Success:` / `Error:` result rendering
//! - `translator.rs` - Field type tag translation for `create_table`
//! - `error.rs` - Tool-specific error types
//!
//! ## Adding a New Tool
//!
//! 1. Create a new file in `definitions/` (e.g., `records/my_tool.rs`)
//! 2. Define params, `execute()` and `to_tool()`
//! 3. Export in `definitions/mod.rs`
//! 4. Register the name, metadata and dispatch arm in `registry.rs`

pub mod args;
pub mod definitions;
pub mod envelope;
mod error;
mod registry;
pub mod translator;

pub use error::ToolError;
pub use registry::ToolRegistry;
